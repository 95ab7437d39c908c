use clap::Subcommand;
use flashdeck::dto::{CreateCollectionDto, UpdateCollectionDto};

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Collection management commands
#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// List your collections
    List,
    /// List everyone's public collections
    Public,
    /// Show a collection and its cards
    Show {
        /// The collection ID
        id: String,
    },
    /// Create a new collection
    Create {
        /// Name, 3 to 50 characters
        #[clap(long)]
        name: String,
        /// Optional description
        #[clap(long)]
        description: Option<String>,
        /// Optional deadline (YYYY-MM-DD or RFC 3339)
        #[clap(long)]
        deadline: Option<String>,
        /// Share the collection publicly
        #[clap(long)]
        public: bool,
    },
    /// Update a collection; only the given fields change
    Update {
        /// The collection ID
        id: String,
        #[clap(long)]
        name: Option<String>,
        /// Pass an empty string to clear
        #[clap(long)]
        description: Option<String>,
        /// Pass an empty string to clear
        #[clap(long)]
        deadline: Option<String>,
        #[clap(long)]
        public: Option<bool>,
    },
    /// Delete a collection (its cards are kept)
    Delete {
        /// The collection ID
        id: String,
    },
}

/// Executes a collection command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: CollectionCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CollectionCommands::List => {
            let collections = client.list_collections().await?;
            output::print_collection_summaries(&collections, config);
        }
        CollectionCommands::Public => {
            let collections = client.list_public_collections().await?;
            output::print_collection_summaries(&collections, config);
        }
        CollectionCommands::Show { id } => {
            let detail = client.get_collection(&id).await?;
            output::print_collection_detail(&detail, config);
        }
        CollectionCommands::Create { name, description, deadline, public } => {
            let dto = CreateCollectionDto { name, description, deadline, is_public: public };
            let collection = client.create_collection(&dto).await?;
            output::print_collection(&collection, config);
        }
        CollectionCommands::Update { id, name, description, deadline, public } => {
            let dto = UpdateCollectionDto { name, description, deadline, is_public: public };
            let collection = client.update_collection(&id, &dto).await?;
            output::print_collection(&collection, config);
        }
        CollectionCommands::Delete { id } => {
            client.delete_collection(&id).await?;
            output::print_success(&format!("Deleted collection {}", id), config);
        }
    }
    Ok(())
}
