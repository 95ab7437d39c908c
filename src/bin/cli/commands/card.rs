use clap::Subcommand;
use flashdeck::dto::CreateFlashCardDto;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Card management commands
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// List the cards of a collection, or every card when no collection is given
    List {
        /// The collection ID
        collection_id: Option<String>,
    },
    /// Create a card inside a collection
    Create {
        /// The collection ID
        collection_id: String,
        #[clap(long)]
        question: String,
        #[clap(long)]
        answer: String,
        /// Difficulty (defaults to 1)
        #[clap(long)]
        difficulty: Option<i32>,
        /// Study weight 1 to 5 (defaults to 1)
        #[clap(long)]
        priority: Option<i32>,
    },
    /// Add an existing card to a collection
    Attach {
        /// The collection ID
        collection_id: String,
        /// The card ID
        card_id: String,
        /// Study weight 1 to 5 (defaults to 1)
        #[clap(long)]
        priority: Option<i32>,
    },
    /// Remove a card from a collection
    Detach {
        /// The collection ID
        collection_id: String,
        /// The card ID
        card_id: String,
    },
    /// Mark a card learned in a collection
    Learn {
        /// The collection ID
        collection_id: String,
        /// The card ID
        card_id: String,
        /// Mark the card unlearned instead
        #[clap(long)]
        unlearn: bool,
    },
    /// Find cards that could be added to a collection
    Search {
        /// The collection ID
        collection_id: String,
        /// Text to look for in questions and answers
        text: String,
    },
    /// Search every card
    SearchAll {
        /// Text to look for in questions and answers
        text: String,
    },
    /// Delete a card everywhere (admin only)
    Delete {
        /// The card ID
        card_id: String,
    },
}

/// Executes a card command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: CardCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CardCommands::List { collection_id: Some(collection_id) } => {
            let relations = client.list_collection_cards(&collection_id).await?;
            output::print_relations(&relations, config);
        }
        CardCommands::List { collection_id: None } => {
            let cards = client.list_flash_cards().await?;
            output::print_flash_cards(&cards, config);
        }
        CardCommands::Create { collection_id, question, answer, difficulty, priority } => {
            let dto = CreateFlashCardDto { question, answer, difficulty, priority };
            let created = client.create_card(&collection_id, &dto).await?;
            output::print_flash_cards(std::slice::from_ref(&created.card), config);
        }
        CardCommands::Attach { collection_id, card_id, priority } => {
            let relation = client.attach_card(&collection_id, &card_id, priority).await?;
            output::print_relation(&relation, config);
        }
        CardCommands::Detach { collection_id, card_id } => {
            let message = client.detach_card(&collection_id, &card_id).await?;
            output::print_success(&message.message, config);
        }
        CardCommands::Learn { collection_id, card_id, unlearn } => {
            let relation = client.set_learned(&collection_id, &card_id, !unlearn).await?;
            output::print_relation(&relation, config);
        }
        CardCommands::Search { collection_id, text } => {
            let cards = client.search_collection_cards(&collection_id, &text).await?;
            output::print_flash_cards(&cards, config);
        }
        CardCommands::SearchAll { text } => {
            let cards = client.search_flash_cards(&text).await?;
            output::print_flash_cards(&cards, config);
        }
        CardCommands::Delete { card_id } => {
            let message = client.delete_flash_card(&card_id).await?;
            output::print_success(&message.message, config);
        }
    }
    Ok(())
}
