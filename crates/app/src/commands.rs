use chrono::Local;
use clap::{Args, Subcommand};
use engine::{
    CategoryId, CategoryIndex, ExpenseDraft, ExpenseId, ExpenseQuery, ExpenseStore, RemoteStore,
    Snapshot, SortKey, ValidationError,
};

use crate::{error::Result, render::Renderer};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Totals, spend per category and the most recent expenses.
    Summary,
    /// List expenses, optionally filtered and sorted.
    List {
        /// Text to look for in titles and notes.
        #[arg(long, default_value = "")]
        search: String,
        /// Category id or name.
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = SortKey::DateDesc)]
        sort: SortKey,
    },
    /// Show one expense, fetched from the server.
    Show { id: ExpenseId },
    /// Record a new expense.
    Add(AddArgs),
    /// Change an expense. Omitted fields keep their current value.
    Edit {
        id: ExpenseId,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete an expense.
    Remove { id: ExpenseId },
    /// List categories with their totals.
    Categories,
    /// Create a category. Names are unique ignoring case.
    AddCategory { name: String },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub amount: String,
    /// Category id or name.
    #[arg(long)]
    pub category: String,
    /// Defaults to now. Accepts YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    /// Pass an empty string to clear the notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// Runs `command` against an initialized store and returns what to print.
pub async fn run<R: RemoteStore>(
    store: &ExpenseStore<R>,
    command: Command,
    renderer: &Renderer,
    json: bool,
) -> Result<String> {
    let output = match command {
        Command::Summary => {
            let snapshot = store.snapshot();
            if json {
                to_json(&snapshot.summary())?
            } else {
                renderer.summary(&snapshot)
            }
        }
        Command::List {
            search,
            category,
            sort,
        } => {
            let snapshot = store.snapshot();
            let category = match category {
                Some(raw) => {
                    let resolved = resolve_category(&snapshot, &raw);
                    let id = resolved
                        .parse::<CategoryId>()
                        .map_err(|_| ValidationError::InvalidCategoryId(resolved))?;
                    Some(id)
                }
                None => None,
            };
            let query = ExpenseQuery {
                search,
                category,
                sort,
            };
            let view = snapshot.query(&query);
            if json {
                to_json(&view)?
            } else {
                renderer.expense_list(&snapshot, &view)
            }
        }
        Command::Show { id } => {
            let expense = store.fetch_expense(id).await?;
            if json {
                to_json(&expense)?
            } else {
                renderer.expense_detail(&store.snapshot(), &expense)
            }
        }
        Command::Add(args) => {
            let snapshot = store.snapshot();
            let draft = ExpenseDraft {
                title: args.title,
                amount: args.amount,
                category_id: resolve_category(&snapshot, &args.category),
                date: args.date.unwrap_or_else(now),
                notes: args.notes.unwrap_or_default(),
            };
            let created = store.add_expense(draft.parse()?).await?;
            tracing::info!(id = %created.id, "expense added");
            if json {
                to_json(&created)?
            } else {
                renderer.expense_detail(&store.snapshot(), &created)
            }
        }
        Command::Edit { id, changes } => {
            let current = store.fetch_expense(id).await?;
            let snapshot = store.snapshot();
            let mut draft = ExpenseDraft::from(&current);
            if let Some(title) = changes.title {
                draft.title = title;
            }
            if let Some(amount) = changes.amount {
                draft.amount = amount;
            }
            if let Some(category) = changes.category {
                draft.category_id = resolve_category(&snapshot, &category);
            }
            if let Some(date) = changes.date {
                draft.date = date;
            }
            if let Some(notes) = changes.notes {
                draft.notes = notes;
            }
            let updated = store.edit_expense(id, draft.parse()?).await?;
            tracing::info!(%id, "expense updated");
            if json {
                to_json(&updated)?
            } else {
                renderer.expense_detail(&store.snapshot(), &updated)
            }
        }
        Command::Remove { id } => {
            store.remove_expense(id).await?;
            tracing::info!(%id, "expense removed");
            if json {
                to_json(&serde_json::json!({ "removed": id }))?
            } else {
                format!("Removed expense #{id}\n")
            }
        }
        Command::Categories => {
            let snapshot = store.snapshot();
            if json {
                to_json(&snapshot.expenses_by_category())?
            } else {
                renderer.categories(&snapshot)
            }
        }
        Command::AddCategory { name } => {
            let created = store.add_category(&name).await?;
            tracing::info!(id = %created.id, "category added");
            if json {
                to_json(&created)?
            } else {
                renderer.category_created(&created)
            }
        }
    };
    Ok(output)
}

/// Maps a category name to its id; anything else is passed through as typed.
fn resolve_category(snapshot: &Snapshot, raw: &str) -> String {
    CategoryIndex::from_categories(&snapshot.categories)
        .get(raw)
        .map(|id| id.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

fn now() -> String {
    api_types::wire_date::format(&Local::now().naive_local())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
