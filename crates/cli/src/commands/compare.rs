//! `cohort compare` - the comparison list.

use std::io::Write;

use clap::{Args, Subcommand};
use cohort_client::compare::{AddOutcome, CompareList, MAX_COMPARE_ITEMS};
use cohort_core::{ComparisonEntry, PropertyId};

use crate::error::CliError;

#[derive(Subcommand)]
pub enum CompareAction {
    /// Add a property to the list
    Add(EntryArgs),
    /// Replace the whole list with one property
    Replace(EntryArgs),
    /// Remove a property by ID
    Remove {
        /// Property ID
        id: String,
    },
    /// Empty the list
    Clear,
    /// Show the list
    List,
}

#[derive(Args)]
pub struct EntryArgs {
    /// Property ID
    #[arg(long)]
    id: String,

    /// Display title
    #[arg(long)]
    title: String,

    /// Display price, e.g. "₹ 1.2 Cr"
    #[arg(long)]
    price: String,

    #[arg(long)]
    image: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    developer: Option<String>,
}

impl From<EntryArgs> for ComparisonEntry {
    fn from(args: EntryArgs) -> Self {
        Self {
            id: PropertyId::new(args.id),
            title: args.title,
            price: args.price,
            image: args.image,
            location: args.location,
            developer: args.developer,
        }
    }
}

/// Run a compare subcommand against the local store.
///
/// # Errors
///
/// Returns an error only if output cannot be written.
pub fn run(action: CompareAction, out: &mut impl Write) -> Result<(), CliError> {
    let list = CompareList::load(super::local_store());

    match action {
        CompareAction::Add(args) => {
            let entry = ComparisonEntry::from(args);
            let id = entry.id.clone();
            match list.add(entry) {
                AddOutcome::Added => {
                    writeln!(out, "Added {id} ({}/{MAX_COMPARE_ITEMS})", list.count())?;
                }
                AddOutcome::AlreadyPresent => writeln!(out, "{id} is already in the list")?,
                AddOutcome::Full => writeln!(
                    out,
                    "List is full ({MAX_COMPARE_ITEMS}/{MAX_COMPARE_ITEMS}); remove a property first"
                )?,
            }
        }
        CompareAction::Replace(args) => {
            list.replace_all(args.into());
            write_list(&list, out)?;
        }
        CompareAction::Remove { id } => {
            let id = PropertyId::new(id);
            if list.contains(&id) {
                list.remove(&id);
                writeln!(out, "Removed {id}")?;
            } else {
                writeln!(out, "{id} is not in the list")?;
            }
        }
        CompareAction::Clear => {
            list.clear();
            writeln!(out, "Cleared")?;
        }
        CompareAction::List => write_list(&list, out)?,
    }
    Ok(())
}

fn write_list(list: &CompareList, out: &mut impl Write) -> std::io::Result<()> {
    let entries = list.entries();
    if entries.is_empty() {
        return writeln!(out, "No properties in the comparison list");
    }
    for (i, entry) in entries.iter().enumerate() {
        write_entry(i + 1, entry, out)?;
    }
    Ok(())
}

fn write_entry(n: usize, entry: &ComparisonEntry, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "{n}. [{}] {} - {}", entry.id, entry.title, entry.price)?;
    if let Some(location) = &entry.location {
        write!(out, " ({location})")?;
    }
    if let Some(developer) = &entry.developer {
        write!(out, " by {developer}")?;
    }
    writeln!(out)
}
