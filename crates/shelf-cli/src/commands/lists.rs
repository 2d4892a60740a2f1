use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_lists_core::{migrate_local_lists, ListCollection};
use media_lists_models::{ListScope, SortDirection, SortMethod};
use media_lists_sources::BackendClient;
use serde_json::json;

use super::context::{resolve_list, AppContext};
use super::progress::Spinner;
use super::prompts;
use super::render;
use crate::output::Output;

fn print_collection(collection: &ListCollection<BackendClient>, output: &Output) -> Result<()> {
    let shown = collection.displayed();
    if output.is_human() {
        if shown.is_empty() {
            output.info(if collection.search_term().is_empty() {
                "No lists yet. Create one with `shelf create <name>`."
            } else {
                "No lists match your search."
            });
            return Ok(());
        }
        output.println(render::lists_table(&shown, collection.scope() != ListScope::Owned).to_string());
        output.info(render::sort_caption(collection.selection(), shown.len()));
    } else {
        output.json(&json!({
            "scope": collection.scope().as_str(),
            "sort": collection.selection(),
            "lists": serde_json::to_value(&shown)?,
        }));
    }
    Ok(())
}

pub async fn run_lists(
    scope: ListScope,
    sort: Option<SortMethod>,
    direction: Option<SortDirection>,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(scope).await?;

    match (sort, direction) {
        (Some(method), Some(direction)) => {
            collection.set_sort(method, direction)?;
        }
        (Some(method), None) => {
            collection.set_sort(method, method.default_direction())?;
        }
        (None, Some(direction)) => {
            let method = collection.selection().method;
            collection.set_sort(method, direction)?;
        }
        (None, None) => {}
    }
    if let Some(term) = search {
        collection.set_search(term);
    }

    print_collection(&collection, output)
}

/// Menu-style sort selection for your own lists
pub async fn run_sort(method: SortMethod, direction: Option<SortDirection>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    let selection = match direction {
        Some(direction) => collection.set_sort(method, direction)?,
        None => collection.select_sort(method)?,
    };
    output.success(format!("Sorting by {}", selection.label()));
    print_collection(&collection, output)
}

pub async fn run_create(name: String, description: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    let created = collection.create(&name, description.as_deref().unwrap_or("")).await?;
    if output.is_human() {
        output.success(format!("Created list \"{}\" ({})", created.name, created.id));
    } else {
        output.json(&serde_json::to_value(&created)?);
    }
    Ok(())
}

pub async fn run_rename(list: String, name: String, description: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    let target = resolve_list(&collection.ordered(), &list)?.clone();
    let description = description.unwrap_or_else(|| target.description.clone());

    let saved = collection.rename(&target.id, &name, &description).await?;
    output.success(format!("Renamed \"{}\" to \"{}\"", target.name, saved.name));
    Ok(())
}

pub async fn run_duplicate(list: String, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    let id = resolve_list(&collection.ordered(), &list)?.id.clone();

    let copy = collection.duplicate(&id).await?;
    output.success(format!("Created \"{}\" ({} items)", copy.name, copy.item_count()));
    Ok(())
}

pub async fn run_delete(list: String, yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    let target = resolve_list(&collection.ordered(), &list)?.clone();

    if !yes {
        let prompt = format!("Delete \"{}\" and its {} items?", target.name, target.item_count());
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Nothing deleted");
            return Ok(());
        }
    }

    collection.delete(&target.id).await?;
    output.success(format!("Deleted \"{}\"", target.name));
    Ok(())
}

/// How `shelf move` repositions a list
pub enum MoveAction {
    Up,
    Down,
    To(usize),
}

pub async fn run_move(position: usize, action: MoveAction, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut collection = ctx.collection(ListScope::Owned).await?;
    if !collection.is_manual() {
        return Err(eyre!("Lists can only be moved in manual order. Run `shelf sort manual` first."));
    }

    let total = collection.ordered().len();
    if position == 0 || position > total {
        return Err(eyre!("Position {} is out of range (1-{})", position, total));
    }
    let index = position - 1;

    let moved = match action {
        MoveAction::Up => collection.move_up(index)?,
        MoveAction::Down => collection.move_down(index)?,
        MoveAction::To(target) => {
            if target == 0 || target > total {
                return Err(eyre!("Target position {} is out of range (1-{})", target, total));
            }
            collection.move_to(index, target - 1)?
        }
    };

    if moved {
        output.success("Manual order saved");
    } else {
        output.info("List is already at the edge; nothing moved");
    }
    print_collection(&collection, output)
}

pub async fn run_migrate(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_login()?;
    let client = ctx.client()?;
    let settings = ctx.settings();

    let pending = settings.try_load().map_err(|e| eyre!("{:#}", e))?.legacy_lists.len();
    if pending == 0 {
        output.info("No local lists to migrate");
        return Ok(());
    }

    let spinner = Spinner::start(format!("Migrating {} local lists...", pending));
    let report = migrate_local_lists(&client, &settings).await?;
    spinner.finish();

    if output.is_human() {
        output.success(format!("Migrated {} local list(s) to your account", report.migrated));
        for list in &report.lists {
            output.info(format!("  {} ({} items)", list.name, list.item_count()));
        }
    } else {
        output.json(&serde_json::to_value(&report)?);
    }
    Ok(())
}
