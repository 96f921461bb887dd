//! `cohort property` - listings through the API.

use std::io::Write;

use clap::Subcommand;
use cohort_core::{PageRequest, PropertyDetail, PropertyId, PropertySummary};

use crate::error::CliError;

#[derive(Subcommand)]
pub enum PropertyAction {
    /// Show one property
    Show {
        /// Property ID
        id: String,
    },
    /// List properties
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = PageRequest::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Toggle a property in your favorites
    Favorite {
        /// Property ID
        id: String,
    },
    /// Join a property's buying group
    Join {
        /// Property ID
        id: String,
    },
}

/// Run a property subcommand.
///
/// # Errors
///
/// Returns an error if configuration is missing, the API call fails, or
/// output cannot be written.
pub async fn run(action: PropertyAction, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = super::app_context()?;
    let api = ctx.api();

    match action {
        PropertyAction::Show { id } => {
            let detail = api.get_property(&PropertyId::new(id)).await?;
            write_detail(&detail, out)?;
        }
        PropertyAction::List { page, limit } => {
            let page = api.list_properties(PageRequest::new(page, limit)).await?;
            if page.items.is_empty() {
                writeln!(out, "No properties")?;
            }
            for property in &page.items {
                write_summary(property, out)?;
            }
            if page.has_more {
                writeln!(out, "(more available)")?;
            }
        }
        PropertyAction::Favorite { id } => {
            let id = PropertyId::new(id);
            if api.toggle_favorite(&id).await? {
                writeln!(out, "Added {id} to favorites")?;
            } else {
                writeln!(out, "Removed {id} from favorites")?;
            }
        }
        PropertyAction::Join { id } => {
            let id = PropertyId::new(id);
            if api.join_group(&id).await? {
                writeln!(out, "Joined the buying group for {id}")?;
            } else {
                writeln!(out, "Could not join the buying group for {id}")?;
            }
        }
    }
    Ok(())
}

fn write_summary(property: &PropertySummary, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "[{}] {} - {}", property.id, property.title, property.price)?;
    if let Some(location) = &property.location {
        write!(out, " ({location})")?;
    }
    if property.is_favorite {
        write!(out, " *")?;
    }
    writeln!(out)
}

fn write_detail(detail: &PropertyDetail, out: &mut impl Write) -> std::io::Result<()> {
    write_summary(&detail.summary, out)?;
    if let Some(developer) = &detail.summary.developer {
        writeln!(out, "Developer: {developer}")?;
    }
    if !detail.configurations.is_empty() {
        writeln!(out, "Configurations: {}", detail.configurations.join(", "))?;
    }
    if !detail.amenities.is_empty() {
        writeln!(out, "Amenities: {}", detail.amenities.join(", "))?;
    }
    match detail.seats_remaining() {
        Some(seats) => writeln!(
            out,
            "Group: {} joined, {seats} seats left",
            detail.summary.group_size
        )?,
        None => writeln!(out, "Group: {} joined", detail.summary.group_size)?,
    }
    if detail.summary.is_group_member {
        writeln!(out, "You are in this group")?;
    }
    if !detail.description.is_empty() {
        writeln!(out, "\n{}", detail.description)?;
    }
    Ok(())
}
