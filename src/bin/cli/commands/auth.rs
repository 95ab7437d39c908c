use clap::Subcommand;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Account and session commands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Create a new account
    Register {
        /// Login name
        username: String,
        /// Password, at least 8 characters
        #[clap(long, env = "FLASHDECK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Create an admin account
        #[clap(long)]
        admin: bool,
    },
    /// Log in and remember the session
    Login {
        /// Login name
        username: String,
        /// Password
        #[clap(long, env = "FLASHDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show the logged-in user
    Me,
}

/// Executes an auth command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: AuthCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AuthCommands::Register { username, password, admin } => {
            let role = admin.then(|| "ADMIN".to_string());
            let user = client.register(username, password, role).await?;
            output::print_user(&user, config);
        }
        AuthCommands::Login { username, password } => {
            let login = client.login(username, password).await?;
            output::print_success(&format!("Logged in as {}", login.user.username), config);
        }
        AuthCommands::Logout => {
            let message = client.logout().await?;
            output::print_success(&message.message, config);
        }
        AuthCommands::Me => {
            let user = client.me().await?;
            output::print_user(&user, config);
        }
    }
    Ok(())
}
