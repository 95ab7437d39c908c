use clap::ValueEnum;
use flashdeck::dto::{CollectionDetailDto, CollectionSummaryDto, RelationDto, UserDto};
use flashdeck::models::{Collection, CollectionFlashCard, FlashCard};
use flashdeck::study::ReviewSession;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: could not encode output: {}", e),
    }
}

/// Prints a user in the specified format
pub fn print_user(user: &UserDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.id);
                return;
            }
            println!("ID:       {}", user.id);
            println!("Username: {}", user.username);
            println!("Role:     {}", user.role);
        }
        OutputFormat::Json => print_json(user),
    }
}

/// Prints a list of collections with their card counts
pub fn print_collection_summaries(collections: &[CollectionSummaryDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if collections.is_empty() {
                if !config.quiet {
                    println!("No collections found.");
                }
                return;
            }
            if config.quiet {
                for summary in collections {
                    println!("{}", summary.collection.get_id());
                }
                return;
            }
            let max_id = collections.iter().map(|c| c.collection.get_id().len()).max().unwrap_or(2);
            let max_name = collections
                .iter()
                .map(|c| c.collection.get_name().chars().count())
                .max()
                .unwrap_or(4)
                .max(4);
            println!("{:<id_w$}  {:<name_w$}  CARDS  OWNER", "ID", "NAME", id_w = max_id, name_w = max_name);
            for summary in collections {
                println!(
                    "{:<id_w$}  {:<name_w$}  {:<5}  {}",
                    summary.collection.get_id(),
                    summary.collection.get_name(),
                    summary.card_count,
                    summary.owner_username.as_deref().unwrap_or("-"),
                    id_w = max_id,
                    name_w = max_name,
                );
            }
        }
        OutputFormat::Json => print_json(collections),
    }
}

/// Prints a single collection in the specified format
pub fn print_collection(collection: &Collection, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", collection.get_id());
                return;
            }
            println!("ID:          {}", collection.get_id());
            println!("Name:        {}", collection.get_name());
            println!("Description: {}", collection.get_description().unwrap_or_default());
            println!(
                "Deadline:    {}",
                collection.get_deadline().map(|d| d.to_rfc3339()).unwrap_or_else(|| "none".to_string())
            );
            println!("Public:      {}", collection.get_is_public());
            println!("Created:     {}", collection.get_created_at());
        }
        OutputFormat::Json => print_json(collection),
    }
}

/// Prints a collection together with its cards
pub fn print_collection_detail(detail: &CollectionDetailDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            print_collection(&detail.collection, config);
            if config.quiet {
                return;
            }
            println!("Cards:       {}", detail.card_count);
            println!();
            print_relations(&detail.cards, config);
        }
        OutputFormat::Json => print_json(detail),
    }
}

/// Prints the cards of a collection with their study state
pub fn print_relations(relations: &[RelationDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if relations.is_empty() {
                if !config.quiet {
                    println!("No cards found.");
                }
                return;
            }
            if config.quiet {
                for relation in relations {
                    println!("{}", relation.flash_card.id);
                }
                return;
            }
            let max_id = relations.iter().map(|r| r.flash_card.id.len()).max().unwrap_or(2);
            println!("{:<width$}  PRIO  LEARNED  QUESTION", "CARD ID", width = max_id);
            for relation in relations {
                println!(
                    "{:<width$}  {:<4}  {:<7}  {}",
                    relation.flash_card.id,
                    relation.priority.unwrap_or(1),
                    if relation.is_learned { "yes" } else { "no" },
                    relation.flash_card.question,
                    width = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(relations),
    }
}

/// Prints a list of cards in the specified format
pub fn print_flash_cards(cards: &[FlashCard], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if cards.is_empty() {
                if !config.quiet {
                    println!("No cards found.");
                }
                return;
            }
            if config.quiet {
                for card in cards {
                    println!("{}", card.get_id());
                }
                return;
            }
            let max_id = cards.iter().map(|c| c.get_id().len()).max().unwrap_or(2);
            println!("{:<width$}  QUESTION  /  ANSWER", "ID", width = max_id);
            for card in cards {
                println!("{:<width$}  {}  /  {}", card.get_id(), card.get_question(), card.get_answer(), width = max_id);
            }
        }
        OutputFormat::Json => print_json(cards),
    }
}

/// Prints a relation between a card and a collection
pub fn print_relation(relation: &CollectionFlashCard, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", relation.get_id());
                return;
            }
            println!("Collection: {}", relation.get_collection_id());
            println!("Card:       {}", relation.get_flash_card_id());
            println!("Priority:   {}", relation.get_priority());
            println!("Learned:    {}", relation.get_is_learned());
        }
        OutputFormat::Json => print_json(relation),
    }
}

/// Prints a success message in the specified format
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({ "message": message })),
    }
}

/// Keys understood by the study loop
pub fn print_study_help(config: &OutputConfig) {
    if matches!(config.format, OutputFormat::Human) && !config.quiet {
        println!("Keys: [f]lip  [n]ext  [p]revious  [l]earned toggle  [q]uit");
    }
}

/// Prints the card currently shown by a study session
pub fn print_study_card(session: &ReviewSession, config: &OutputConfig) {
    let (Some(card), Some((position, total))) = (session.current(), session.progress()) else {
        return;
    };
    let flipped = session.is_flipped();

    match config.format {
        OutputFormat::Human => {
            println!();
            println!("[{}/{}]{}", position, total, if card.is_learned { " (learned)" } else { "" });
            println!("Q: {}", card.question);
            if flipped {
                println!("A: {}", card.answer);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "position": position,
            "total": total,
            "cardId": card.id,
            "question": card.question,
            "answer": if flipped { Some(&card.answer) } else { None },
            "isLearned": card.is_learned,
        })),
    }
}
