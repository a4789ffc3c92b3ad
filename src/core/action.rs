//! # Actions
//!
//! Everything that can happen in mdpad becomes an `Action`.
//! User types in the editor? That's `Action::EditText(body)`.
//! The cloud listing comes back? That's `Action::CloudListReceived(result)`.
//!
//! The `update()` function takes the current state and an action,
//! then returns the effects to perform. No side effects here. I/O happens
//! elsewhere: the shell interprets each `Effect` and feeds the eventual
//! result back in as a new action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! This makes everything testable: run an action, assert on the state and
//! the emitted effects. And debuggable: log every action, replay the exact
//! session.
//!
//! `update()` is total. Malformed bridge payloads collapse to an empty
//! note, remote errors leave the state untouched; no action can make the
//! editor unusable.

use crate::bridge::decode_payload;
use crate::core::state::{App, ColorTheme, LayoutMode, Note, Preferences};
use crate::store::StoreError;

/// An activated menu entry. These arrive from the view layer, which tags
/// every menu leaf with one of these (see `view::menu`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    NewFile,
    OpenFile,
    SaveFile,
    ListCloudFiles,
    OpenCloudFile(String),
    SaveCloudFile,
    SetTheme(ColorTheme),
    /// Menu layout switch. Only `Write` and `Focus` are honoured;
    /// `Read` through the menu is a no-op (toggle-only mode).
    ChangeLayout(LayoutMode),
}

#[derive(Debug)]
pub enum Action {
    /// Editor text changed.
    EditText(String),
    /// Layout switcher control (not the menu; all modes allowed).
    SetLayout(LayoutMode),
    /// Editor/preview flip: Focus ⇄ Read.
    TogglePreview,
    /// A menu entry was activated.
    Menu(MenuAction),
    /// Bridge `file-loaded(json)`: a device file was opened.
    NoteLoaded(String),
    /// Bridge `file-built(json)`: a fresh device file was created.
    NoteBuilt(String),
    /// Bridge `file-written(bool)`: a device write finished.
    NoteWritten(bool),
    /// `GET /files` finished.
    CloudListReceived(Result<Vec<String>, StoreError>),
    /// `GET /files/{id}` finished.
    CloudFileReceived {
        name: String,
        result: Result<String, StoreError>,
    },
    /// `POST /files/{id}` finished (body echo on success).
    CloudSaveAcknowledged(Result<String, StoreError>),
}

/// A description of an intended side effect. Emitted by `update()`,
/// performed by the shell. Order within one transition is meaningful and
/// must be preserved by the interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Ask the bridge to create a fresh file; `NoteBuilt` comes back.
    BuildNewFile,
    /// Ask the bridge to open a file; `NoteLoaded` comes back.
    OpenFilePicker,
    /// Overwrite the bound device file with this text; `NoteWritten` comes back.
    OverwriteFile(String),
    /// Save-as with this text; `NoteWritten` comes back.
    SaveFileAs(String),
    /// Push the live editor text to the host (title/sync consumers).
    PropagateText(String),
    /// Push the document title to the host.
    PropagateTitle(String),
    /// Persist the given preferences to device storage.
    PersistPreferences(Preferences),
    /// `GET /files`; `CloudListReceived` comes back.
    FetchCloudList,
    /// `GET /files/{id}`; `CloudFileReceived` comes back.
    FetchCloudFile(String),
    /// `POST /files/{id}`; `CloudSaveAcknowledged` comes back.
    PushCloudFile { name: String, text: String },
}

/// The transition function. Pure and synchronous; never blocks, never
/// fails. Returns the effects this transition wants performed, in issue
/// order.
pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::EditText(body) => {
            app.note.text = body.clone();
            vec![Effect::PropagateText(body)]
        }

        Action::SetLayout(mode) => {
            app.prefs.layout_mode = mode;
            vec![]
        }

        Action::TogglePreview => {
            match app.prefs.layout_mode {
                LayoutMode::Focus => app.prefs.layout_mode = LayoutMode::Read,
                LayoutMode::Read => app.prefs.layout_mode = LayoutMode::Focus,
                // Write has no preview flip.
                LayoutMode::Write => {}
            }
            vec![]
        }

        Action::NoteLoaded(raw) => {
            app.note = decode_payload(&raw)
                .map(|p| p.into_note())
                .unwrap_or_default();
            vec![]
        }

        Action::NoteBuilt(raw) => {
            app.note = match decode_payload(&raw) {
                Ok(payload) => {
                    if app.note.text.is_empty() {
                        // Fresh editor: seed the new file with a title line.
                        let title = template_title(&payload.name);
                        Note::new(payload.name, payload.last_modified, title)
                    } else {
                        // Text in progress wins over the template.
                        let kept = std::mem::take(&mut app.note.text);
                        Note::new(payload.name, payload.last_modified, kept)
                    }
                }
                Err(_) => Note::default(),
            };
            vec![]
        }

        Action::NoteWritten(_) => vec![],

        Action::Menu(menu) => update_menu(app, menu),

        Action::CloudListReceived(Ok(list)) => {
            app.cloud_files = list;
            vec![]
        }
        Action::CloudListReceived(Err(_)) => vec![],

        Action::CloudFileReceived {
            name,
            result: Ok(text),
        } => {
            // Cloud-sourced notes are unbound: saving locally is a save-as.
            app.note = Note::new(name.clone(), None, text);
            vec![Effect::PropagateTitle(name)]
        }
        Action::CloudFileReceived { result: Err(_), .. } => vec![],

        Action::CloudSaveAcknowledged(_) => vec![],
    }
}

fn update_menu(app: &mut App, menu: MenuAction) -> Vec<Effect> {
    match menu {
        MenuAction::NewFile => vec![Effect::BuildNewFile],
        MenuAction::OpenFile => vec![Effect::OpenFilePicker],
        MenuAction::SaveFile => {
            let text = app.note.text.clone();
            if app.note.last_modified.is_some() {
                vec![Effect::OverwriteFile(text)]
            } else {
                vec![Effect::SaveFileAs(text)]
            }
        }
        MenuAction::ListCloudFiles => vec![Effect::FetchCloudList],
        MenuAction::OpenCloudFile(name) => vec![Effect::FetchCloudFile(name)],
        MenuAction::SaveCloudFile => vec![Effect::PushCloudFile {
            name: app.note.name.clone(),
            text: app.note.text.clone(),
        }],
        MenuAction::SetTheme(theme) => {
            app.prefs.color_theme = theme;
            vec![]
        }
        MenuAction::ChangeLayout(LayoutMode::Read) => vec![],
        MenuAction::ChangeLayout(mode) => {
            app.prefs.layout_mode = mode;
            vec![]
        }
    }
}

/// The persistence wrapper: runs `update()` and appends a
/// `PersistPreferences` effect, unconditionally and always last.
/// Persisting identical values repeatedly is safe and expected.
pub fn update_and_persist(app: &mut App, action: Action) -> Vec<Effect> {
    let mut effects = update(app, action);
    effects.push(Effect::PersistPreferences(app.prefs));
    effects
}

/// Title line for a freshly built file: `"plan.md"` → `"# plan"`.
/// Falls back to the full name when there is no stem.
fn template_title(name: &str) -> String {
    let stem = std::path::Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    format!("# {stem}")
}
