use clap::{Parser, Subcommand};
use std::process;
use userstash::{document, seed, UserStore};

/// userstash CLI — manage the user document from the command line
#[derive(Parser)]
#[command(name = "userstash", version, about)]
struct Cli {
    /// Path to the document file
    #[arg(long, default_value = "data/users.json")]
    data_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all users
    List,

    /// Get a single user by id
    Get {
        /// User id
        id: String,
    },

    /// Create a new user; the id is assigned automatically
    Create {
        /// Field values (e.g. --field name="Alice Chen")
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Replace a user wholesale, keeping its id
    Replace {
        /// User id
        id: String,
        /// Field values for the replacement record
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Delete a user
    Delete {
        /// User id
        id: String,
    },

    /// Fetch the remote seed dataset and overwrite the document
    Seed {
        /// Seed endpoint
        #[arg(long, default_value = seed::DEFAULT_SEED_URL)]
        url: String,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> userstash::Result<()> {
    let store = UserStore::new(&cli.data_file);

    match cli.command {
        Command::List => {
            let users = store.list()?;
            print_output(&serde_json::to_value(users)?);
        }

        Command::Get { id } => {
            let user = store.get(document::parse_id(&id)?)?;
            print_output(&serde_json::Value::Object(user));
        }

        Command::Create { fields } => {
            let id = store.create(fields_to_value(&fields))?;
            print_output(&serde_json::json!({ "id": id }));
        }

        Command::Replace { id, fields } => {
            let users = store.replace(document::parse_id(&id)?, fields_to_value(&fields))?;
            print_output(&serde_json::to_value(users)?);
        }

        Command::Delete { id } => {
            let users = store.remove(document::parse_id(&id)?)?;
            print_output(&serde_json::to_value(users)?);
        }

        Command::Seed { url } => {
            seed::fetch_seed(&url, &store).await?;
            print_output(&serde_json::json!({ "ok": true, "saved": cli.data_file }));
        }
    }

    Ok(())
}

fn print_output(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

fn fields_to_value(fields: &[(String, String)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, val) in fields {
        // Try to parse as JSON value (for numbers, booleans, arrays, objects)
        let json_val = serde_json::from_str(val).unwrap_or(serde_json::Value::String(val.clone()));
        map.insert(key.clone(), json_val);
    }
    serde_json::Value::Object(map)
}
