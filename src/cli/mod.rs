use clap::{Parser, Subcommand};

use crate::auth::{self, password::hash_password};
use crate::config;

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly admin tooling - tokens, config and password hashes")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Issue a signed token for a user")]
    Token {
        #[arg(long, help = "Username to embed in the token")]
        username: String,
        #[arg(long, help = "Mark the token as admin")]
        admin: bool,
    },

    #[command(about = "Show the effective configuration (secrets omitted)")]
    Config,

    #[command(about = "Hash a password the way the API stores it")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();

    match cli.command {
        Commands::Token { username, admin } => {
            let token = auth::create_token(&username, admin)?;
            if cli.json {
                println!("{}", serde_json::json!({ "token": token }));
            } else {
                println!("{}", token);
            }
        }
        Commands::Config => {
            let rendered = if cli.json {
                serde_json::to_string(config)?
            } else {
                serde_json::to_string_pretty(config)?
            };
            println!("{}", rendered);
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password, config.security.password_work_factor)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::parse_from(["jobly", "token", "--username", "u1", "--admin"]);
        match cli.command {
            Commands::Token { username, admin } => {
                assert_eq!(username, "u1");
                assert!(admin);
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn parses_hash_password() {
        let cli = Cli::parse_from(["jobly", "--json", "hash-password", "secret"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::HashPassword { ref password } if password == "secret"));
    }
}
