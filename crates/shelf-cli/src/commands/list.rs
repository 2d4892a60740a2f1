use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_lists_core::{CoreError, EditorMode, ListEditor};
use media_lists_models::{ListScope, MediaKind};
use media_lists_sources::{BackendClient, SearchRegistry};
use serde_json::json;
use tracing::{debug, warn};

use super::context::{resolve_list, AppContext};
use super::progress::Spinner;
use super::prompts;
use super::render;
use super::search::{pick_result, search_with_spinner};
use crate::output::Output;

/// Open a list by position, name or id among your own lists, falling back to
/// a direct id lookup so public and followed lists work too.
async fn open_editor(ctx: &AppContext, key: &str) -> Result<(BackendClient, ListEditor)> {
    let client = ctx.client()?;

    let id = if ctx.session.is_logged_in() {
        let collection = ctx.collection(ListScope::Owned).await?;
        match resolve_list(&collection.ordered(), key) {
            Ok(list) => list.id.clone(),
            Err(e) => {
                debug!("{}; trying '{}' as a list id", e, key);
                key.trim().to_string()
            }
        }
    } else {
        key.trim().to_string()
    };

    let spinner = Spinner::start("Loading list...");
    let editor = ListEditor::open(&client, &id).await?;
    spinner.finish();
    Ok((client, editor))
}

/// Fails closed: a token without a readable username cannot edit
fn ensure_can_edit(ctx: &AppContext, editor: &ListEditor) -> Result<()> {
    check_can_edit(ctx.username().as_deref(), editor)
}

fn check_can_edit(username: Option<&str>, editor: &ListEditor) -> Result<()> {
    if username.is_none() {
        warn!("Could not read a username from the stored session token");
    }
    if editor.can_edit(username) {
        Ok(())
    } else {
        Err(CoreError::NotPermitted.into())
    }
}

fn print_list(editor: &ListEditor, output: &Output) -> Result<()> {
    let list = editor.current();
    if output.is_human() {
        output.println(render::list_details(&list).to_string());
        if list.items.is_empty() {
            output.info("This list is empty. Add something with `shelf add`.");
        } else {
            output.println(render::items_table(&list.items).to_string());
        }
    } else {
        output.json(&serde_json::to_value(&list)?);
    }
    Ok(())
}

pub async fn run_show(list: String, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let (_, editor) = open_editor(&ctx, &list).await?;
    print_list(&editor, output)
}

/// Non-interactive edits gathered from command-line flags
#[derive(Default)]
pub struct EditFlags {
    pub description: Option<String>,
    pub public: Option<bool>,
    pub collaborative: Option<bool>,
    pub add_collaborators: Vec<String>,
    pub remove_collaborators: Vec<String>,
}

impl EditFlags {
    fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.public.is_none()
            && self.collaborative.is_none()
            && self.add_collaborators.is_empty()
            && self.remove_collaborators.is_empty()
    }
}

pub async fn run_edit(list: String, flags: EditFlags, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_login()?;
    let (client, mut editor) = open_editor(&ctx, &list).await?;
    ensure_can_edit(&ctx, &editor)?;

    editor.begin_edit();
    if flags.is_empty() {
        return edit_interactively(&client, editor, output).await;
    }

    if let Some(description) = &flags.description {
        editor.set_description(description)?;
    }
    if let Some(public) = flags.public {
        editor.set_public(public)?;
    }
    if let Some(collaborative) = flags.collaborative {
        editor.set_collaborative(collaborative)?;
    }
    for username in &flags.add_collaborators {
        editor.add_collaborator(&client, username).await?;
    }
    for username in &flags.remove_collaborators {
        if !editor.remove_collaborator(username)? {
            output.warn(format!("{} is not a collaborator", username));
        }
    }

    save(&client, &mut editor, output).await
}

async fn save(client: &BackendClient, editor: &mut ListEditor, output: &Output) -> Result<()> {
    if !editor.is_modified() {
        editor.cancel();
        output.info("No changes to save");
        return Ok(());
    }
    let spinner = Spinner::start("Saving list...");
    editor.save(client).await?;
    spinner.finish();
    output.success(format!("Saved \"{}\"", editor.server_copy().name));
    Ok(())
}

const MENU: [&str; 9] = [
    "Move an item",
    "Remove an item",
    "Edit description",
    "Toggle public",
    "Toggle collaborative",
    "Add collaborator",
    "Remove collaborator",
    "Save",
    "Cancel",
];

/// Menu loop over a draft; nothing is written until "Save"
async fn edit_interactively(client: &BackendClient, mut editor: ListEditor, output: &Output) -> Result<()> {
    while editor.mode() == EditorMode::Editing {
        output.println(render::items_table(editor.items()).to_string());
        let choice = prompts::prompt_select("Edit list", &MENU)?;
        let result = match choice {
            Some(0) => {
                let len = editor.items().len();
                if len < 2 {
                    output.warn("Nothing to reorder");
                    continue;
                }
                let from = prompts::prompt_position("Move item", len)?;
                let to = prompts::prompt_position("To position", len)?;
                editor.move_item(from - 1, to - 1)
            }
            Some(1) => {
                let len = editor.items().len();
                if len == 0 {
                    output.warn("The list is empty");
                    continue;
                }
                let position = prompts::prompt_position("Remove item", len)?;
                editor.remove_item(position - 1).map(|removed| {
                    output.info(format!("Removed {}", removed.display_title()));
                })
            }
            Some(2) => {
                let current = editor.current().description;
                let description = prompts::prompt_string("Description", Some(&current))?;
                editor.set_description(description.trim())
            }
            Some(3) => {
                let public = !editor.current().is_public;
                editor.set_public(public)
            }
            Some(4) => {
                let collaborative = !editor.current().is_collaborative;
                editor.set_collaborative(collaborative)
            }
            Some(5) => {
                let username = prompts::prompt_required("Username")?;
                editor.add_collaborator(client, &username).await
            }
            Some(6) => {
                let collaborators = editor.collaborators().to_vec();
                if collaborators.is_empty() {
                    output.warn("No collaborators to remove");
                    continue;
                }
                match prompts::prompt_select("Remove collaborator", &collaborators)? {
                    Some(index) => editor.remove_collaborator(&collaborators[index]).map(|_| ()),
                    None => continue,
                }
            }
            Some(7) => return save(client, &mut editor, output).await,
            _ => {
                if !editor.can_close()
                    && !prompts::prompt_yes_no("Discard unsaved changes?", false)?
                {
                    continue;
                }
                editor.cancel();
                output.info("Changes discarded");
                return Ok(());
            }
        };

        // Bad input keeps the menu open
        if let Err(e) = result {
            output.error(e.to_string());
        }
    }
    Ok(())
}

pub async fn run_add(
    list: String,
    kind: MediaKind,
    query: String,
    pick: Option<usize>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_login()?;
    let registry = SearchRegistry::from_config(&ctx.config)?;
    let (client, mut editor) = open_editor(&ctx, &list).await?;
    ensure_can_edit(&ctx, &editor)?;

    let results = search_with_spinner(&registry, kind, &query).await?;
    let Some(item) = pick_result(results, pick, output)? else {
        output.info("Nothing added");
        return Ok(());
    };

    let title = item.display_title();
    let spinner = Spinner::start("Saving list...");
    editor.add_item(&client, item).await?;
    spinner.finish();

    if output.is_human() {
        output.success(format!("Added {} to \"{}\"", title, editor.server_copy().name));
    } else {
        output.json(&json!({
            "type": "added",
            "list": editor.server_copy().id,
            "title": title,
            "items": editor.server_copy().item_count(),
        }));
    }
    Ok(())
}

pub async fn run_remove(list: String, position: usize, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_login()?;
    let (client, mut editor) = open_editor(&ctx, &list).await?;
    ensure_can_edit(&ctx, &editor)?;

    if position == 0 {
        return Err(eyre!("Positions start at 1"));
    }
    editor.begin_edit();
    let removed = editor.remove_item(position - 1)?;
    output.info(format!("Removing {}", removed.display_title()));
    save(&client, &mut editor, output).await
}

pub async fn run_reorder(list: String, from: usize, to: usize, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_login()?;
    let (client, mut editor) = open_editor(&ctx, &list).await?;
    ensure_can_edit(&ctx, &editor)?;

    if from == 0 || to == 0 {
        return Err(eyre!("Positions start at 1"));
    }
    editor.begin_edit();
    editor.move_item(from - 1, to - 1)?;
    save(&client, &mut editor, output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_lists_models::MediaList;

    fn editor() -> ListEditor {
        let list: MediaList = serde_json::from_value(json!({
            "_id": "l1",
            "name": "Watch Next",
            "user_id": "alice",
            "collaborators": ["bob"]
        }))
        .unwrap();
        ListEditor::new(list)
    }

    #[test]
    fn test_check_can_edit_fails_closed() {
        let editor = editor();
        assert!(check_can_edit(Some("alice"), &editor).is_ok());
        assert!(check_can_edit(Some("bob"), &editor).is_ok());
        assert!(check_can_edit(Some("mallory"), &editor).is_err());
        assert!(check_can_edit(None, &editor).is_err());
    }
}
