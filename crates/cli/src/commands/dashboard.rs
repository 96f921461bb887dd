//! `cohort dashboard` - the signed-in user's activity.

use std::io::Write;

use chrono::Utc;
use clap::Subcommand;
use cohort_client::dashboard::{
    favorites_by_location, group_searches_by_day, group_visits, paginate, recent_views,
};
use cohort_core::{SiteVisit, ViewedProperty};

use crate::error::CliError;

#[derive(Subcommand)]
pub enum DashboardAction {
    /// Site visits, split into upcoming, past and cancelled
    Visits,
    /// Search history by day
    Searches,
    /// Recently viewed properties, latest view of each
    Viewed {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Favorited properties
    Favorites {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
}

/// Run a dashboard subcommand.
///
/// # Errors
///
/// Returns an error if configuration is missing, the user is not signed in,
/// the API call fails, or output cannot be written.
pub async fn run(action: DashboardAction, out: &mut impl Write) -> Result<(), CliError> {
    let ctx = super::app_context()?;
    let api = ctx.api();

    match action {
        DashboardAction::Visits => {
            let groups = group_visits(api.site_visits().await?, Utc::now());
            write_visits("Upcoming", &groups.upcoming, out)?;
            write_visits("Past", &groups.past, out)?;
            write_visits("Cancelled", &groups.cancelled, out)?;
        }
        DashboardAction::Searches => {
            let days = group_searches_by_day(api.search_history().await?);
            if days.is_empty() {
                writeln!(out, "No searches yet")?;
            }
            for (day, searches) in days {
                writeln!(out, "{day}")?;
                for search in searches {
                    write!(out, "  {} {}", search.searched_at.format("%H:%M"), search.query)?;
                    if let Some(place) = &search.location {
                        write!(out, " near {}", place.name)?;
                    }
                    writeln!(out)?;
                }
            }
        }
        DashboardAction::Viewed { limit } => {
            write_views(recent_views(api.viewed().await?, limit), out)?;
        }
        DashboardAction::Favorites { page, per_page } => {
            let favorites = api.favorites().await?;
            let slice = paginate(&favorites, page, per_page);
            for property in &slice.items {
                writeln!(out, "[{}] {} - {}", property.id, property.title, property.price)?;
            }
            writeln!(
                out,
                "Page {}/{} ({} favorites)",
                slice.page, slice.total_pages, slice.total_items
            )?;
            for (location, count) in favorites_by_location(&favorites) {
                writeln!(out, "  {location}: {count}")?;
            }
        }
    }
    Ok(())
}

fn write_visits(label: &str, visits: &[SiteVisit], out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{label} ({})", visits.len())?;
    for visit in visits {
        writeln!(
            out,
            "  {} {}",
            visit.scheduled_at.format("%Y-%m-%d %H:%M"),
            visit.property.title
        )?;
    }
    Ok(())
}

fn write_views(views: Vec<ViewedProperty>, out: &mut impl Write) -> std::io::Result<()> {
    if views.is_empty() {
        return writeln!(out, "Nothing viewed yet");
    }
    for view in views {
        writeln!(
            out,
            "{} [{}] {} - {}",
            view.viewed_at.format("%Y-%m-%d %H:%M"),
            view.property.id,
            view.property.title,
            view.property.price
        )?;
    }
    Ok(())
}
