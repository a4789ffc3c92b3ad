//! # View Projection
//!
//! Pure `state -> render tree`. Nothing here touches a DOM or a terminal;
//! the output is plain data for whatever renderer hosts the editor. The
//! projection owns menu composition and the theme/layout class choice;
//! markdown-to-HTML lives in [`preview`].
//!
//! Class mappings are total matches with no wildcard arm: a new enum
//! variant must fail to compile until it gets a class.

pub mod preview;

use crate::core::action::MenuAction;
use crate::core::state::{App, ColorTheme, LayoutMode};

/// A menu entry: either an activatable leaf or a named group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Leaf {
        id: String,
        label: String,
        action: MenuAction,
    },
    Node {
        id: String,
        label: String,
        children: Vec<MenuItem>,
    },
}

impl MenuItem {
    fn leaf(id: &str, label: &str, action: MenuAction) -> Self {
        MenuItem::Leaf {
            id: id.to_string(),
            label: label.to_string(),
            action,
        }
    }

    fn node(id: &str, label: &str, children: Vec<MenuItem>) -> Self {
        MenuItem::Node {
            id: id.to_string(),
            label: label.to_string(),
            children,
        }
    }
}

/// Style class for the color theme.
pub fn theme_class(theme: ColorTheme) -> &'static str {
    match theme {
        ColorTheme::White => "theme-white",
        ColorTheme::Dark => "theme-dark",
    }
}

/// Style class for the layout mode.
pub fn layout_class(layout: LayoutMode) -> &'static str {
    match layout {
        LayoutMode::Write => "layout-write",
        LayoutMode::Focus => "layout-focus",
        LayoutMode::Read => "layout-read",
    }
}

/// The File / Cloud / View menu bar. The Cloud → Open submenu is rebuilt
/// from `cloud_files` on every projection, one child per known filename.
pub fn menu(app: &App) -> Vec<MenuItem> {
    let cloud_open_children = app
        .cloud_files
        .iter()
        .map(|name| {
            MenuItem::leaf(
                &format!("cloud-open-{name}"),
                name,
                MenuAction::OpenCloudFile(name.clone()),
            )
        })
        .collect();

    vec![
        MenuItem::node(
            "file",
            "File",
            vec![
                MenuItem::leaf("file-new", "New", MenuAction::NewFile),
                MenuItem::leaf("file-open", "Open...", MenuAction::OpenFile),
                MenuItem::leaf("file-save", "Save", MenuAction::SaveFile),
            ],
        ),
        MenuItem::node(
            "cloud",
            "Cloud",
            vec![
                MenuItem::leaf("cloud-refresh", "Refresh", MenuAction::ListCloudFiles),
                MenuItem::node("cloud-open", "Open", cloud_open_children),
                MenuItem::leaf("cloud-save", "Save", MenuAction::SaveCloudFile),
            ],
        ),
        MenuItem::node(
            "view",
            "View",
            vec![
                MenuItem::node(
                    "view-theme",
                    "Theme",
                    vec![
                        MenuItem::leaf(
                            "view-theme-white",
                            "White",
                            MenuAction::SetTheme(ColorTheme::White),
                        ),
                        MenuItem::leaf(
                            "view-theme-dark",
                            "Dark",
                            MenuAction::SetTheme(ColorTheme::Dark),
                        ),
                    ],
                ),
                MenuItem::leaf(
                    "view-write",
                    "Write",
                    MenuAction::ChangeLayout(LayoutMode::Write),
                ),
                MenuItem::leaf(
                    "view-focus",
                    "Focus",
                    MenuAction::ChangeLayout(LayoutMode::Focus),
                ),
            ],
        ),
    ]
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub theme_class: &'static str,
    pub layout_class: &'static str,
    pub menu: Vec<MenuItem>,
    pub title: String,
    pub editor_text: String,
    pub preview_html: String,
    pub show_editor: bool,
    pub show_preview: bool,
}

/// Project the application state into a render tree.
pub fn project(app: &App) -> ViewModel {
    let layout = app.prefs.layout_mode;
    let (show_editor, show_preview) = match layout {
        LayoutMode::Write => (true, true),
        LayoutMode::Focus => (true, false),
        LayoutMode::Read => (false, true),
    };

    ViewModel {
        theme_class: theme_class(app.prefs.color_theme),
        layout_class: layout_class(layout),
        menu: menu(app),
        title: app.note.name.clone(),
        editor_text: app.note.text.clone(),
        preview_html: if show_preview {
            preview::render_html(&app.note.text)
        } else {
            String::new()
        },
        show_editor,
        show_preview,
    }
}
