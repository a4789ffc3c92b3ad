//! # Shell
//!
//! The outer loop that makes the pure core do things. It owns the `App`,
//! receives `Action`s on a channel, runs `update_and_persist`, performs
//! each returned `Effect`, and publishes a fresh `ViewModel` after every
//! transition.
//!
//! ```text
//! renderer ──Action──▶ Shell ──update_and_persist()──▶ effects
//!    ▲                   │                                │
//!    └──watch ViewModel──┘      bridge / store tasks ◀────┘
//!                                    │
//!                                    └──result Action──▶ Shell (again)
//! ```
//!
//! Every I/O effect is fire-and-forget: a spawned task performs the call
//! and sends the outcome back into the same action channel. Responses are
//! applied in arrival order, so a stale cloud GET landing after the user
//! switched notes still applies (accepted race; requests carry no
//! generation counter).
//!
//! The loop exits when every handle to the action channel is gone and the
//! in-flight tasks have drained - no explicit teardown, matching the
//! session lifecycle.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};

use crate::bridge::LocalBridge;
use crate::core::action::{Action, Effect, update_and_persist};
use crate::core::prefs;
use crate::core::state::{App, Preferences};
use crate::store::StoreClient;
use crate::view::{self, ViewModel};

/// What an embedding renderer holds: a way to inject actions and a way to
/// observe the latest frame.
pub struct ShellHandle {
    pub actions: mpsc::UnboundedSender<Action>,
    pub view: watch::Receiver<ViewModel>,
}

pub struct Shell {
    app: App,
    bridge: Arc<dyn LocalBridge>,
    store: Arc<StoreClient>,
    rx: mpsc::UnboundedReceiver<Action>,
    /// Weak so the channel closes once external handles are gone;
    /// upgraded per spawned task for result re-injection.
    tx: mpsc::WeakUnboundedSender<Action>,
    view_tx: watch::Sender<ViewModel>,
}

impl Shell {
    /// Build a shell around freshly loaded preferences. The first
    /// `ViewModel` is available on the handle immediately.
    pub fn new(
        prefs: Preferences,
        bridge: Arc<dyn LocalBridge>,
        store: Arc<StoreClient>,
    ) -> (Self, ShellHandle) {
        let app = App::new(prefs);
        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(view::project(&app));

        let shell = Self {
            app,
            bridge,
            store,
            rx,
            tx: tx.downgrade(),
            view_tx,
        };
        let handle = ShellHandle {
            actions: tx,
            view: view_rx,
        };
        (shell, handle)
    }

    /// Pump actions until the channel closes.
    pub async fn run(mut self) {
        while let Some(action) = self.rx.recv().await {
            debug!("Shell received: {:?}", action);
            let effects = update_and_persist(&mut self.app, action);
            for effect in effects {
                self.dispatch(effect);
            }
            // Re-render from the new state, whether or not anything drew
            // effects from this transition.
            self.view_tx.send_replace(view::project(&self.app));
        }
    }

    /// Perform one effect. Emission order is preserved (tasks are spawned
    /// in order); completion order is up to the I/O.
    fn dispatch(&self, effect: Effect) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };

        match effect {
            Effect::BuildNewFile => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    match bridge.build_new_file().await {
                        Ok(raw) => send(&tx, Action::NoteBuilt(raw)),
                        Err(e) => warn!("create-new-file failed: {}", e),
                    }
                });
            }
            Effect::OpenFilePicker => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    match bridge.open_file().await {
                        Ok(raw) => send(&tx, Action::NoteLoaded(raw)),
                        Err(e) => warn!("open-file failed: {}", e),
                    }
                });
            }
            Effect::OverwriteFile(text) => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    match bridge.overwrite_file(&text).await {
                        Ok(written) => send(&tx, Action::NoteWritten(written)),
                        Err(e) => warn!("overwrite-file failed: {}", e),
                    }
                });
            }
            Effect::SaveFileAs(text) => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    match bridge.save_file_as(&text).await {
                        Ok(written) => send(&tx, Action::NoteWritten(written)),
                        Err(e) => warn!("save-file-as failed: {}", e),
                    }
                });
            }
            Effect::PropagateText(text) => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    bridge.propagate_text(&text).await;
                });
            }
            Effect::PropagateTitle(title) => {
                let bridge = self.bridge.clone();
                tokio::spawn(async move {
                    bridge.propagate_title(&title).await;
                });
            }
            Effect::PersistPreferences(p) => {
                let bridge = self.bridge.clone();
                let json = prefs::encode(&p);
                tokio::spawn(async move {
                    bridge.persist_preferences(&json).await;
                });
            }
            Effect::FetchCloudList => {
                let store = self.store.clone();
                tokio::spawn(async move {
                    let result = store.list().await;
                    send(&tx, Action::CloudListReceived(result));
                });
            }
            Effect::FetchCloudFile(name) => {
                let store = self.store.clone();
                tokio::spawn(async move {
                    let result = store.get(&name).await;
                    send(&tx, Action::CloudFileReceived { name, result });
                });
            }
            Effect::PushCloudFile { name, text } => {
                let store = self.store.clone();
                tokio::spawn(async move {
                    let result = store.put(&name, &text).await;
                    send(&tx, Action::CloudSaveAcknowledged(result));
                });
            }
        }
    }
}

fn send(tx: &mpsc::UnboundedSender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Shell gone, dropping result action");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::MenuAction;
    use crate::core::state::LayoutMode;
    use crate::test_support::NoopBridge;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn start_shell(base_url: &str) -> ShellHandle {
        let (shell, handle) = Shell::new(
            Preferences::default(),
            Arc::new(NoopBridge),
            Arc::new(StoreClient::new(base_url)),
        );
        tokio::spawn(shell.run());
        handle
    }

    #[tokio::test]
    async fn test_edit_text_publishes_new_view() {
        let mut handle = start_shell("http://localhost:0");
        handle
            .actions
            .send(Action::EditText("# hi".to_string()))
            .unwrap();

        handle.view.changed().await.unwrap();
        let vm = handle.view.borrow().clone();
        assert_eq!(vm.editor_text, "# hi");
        assert!(vm.preview_html.contains("<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn test_cloud_listing_lands_in_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec!["a.md", "b.md"]))
            .mount(&server)
            .await;

        let mut handle = start_shell(&server.uri());
        handle
            .actions
            .send(Action::Menu(MenuAction::ListCloudFiles))
            .unwrap();

        // First frame: the menu action itself. Second: the listing result.
        loop {
            handle.view.changed().await.unwrap();
            let menu = handle.view.borrow().menu.clone();
            let crate::view::MenuItem::Node { children, .. } = &menu[1] else {
                panic!("cloud menu should be a node");
            };
            let crate::view::MenuItem::Node {
                children: open_children,
                ..
            } = &children[1]
            else {
                panic!("cloud open should be a node");
            };
            if open_children.len() == 2 {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_store_error_leaves_view_stable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut handle = start_shell(&server.uri());
        handle
            .actions
            .send(Action::Menu(MenuAction::ListCloudFiles))
            .unwrap();
        // Menu action frame first; give the absorbed error time to land
        // (frames coalesce, so we can't count change notifications).
        handle.view.changed().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let vm = handle.view.borrow().clone();
        assert_eq!(vm.layout_class, crate::view::layout_class(LayoutMode::Write));
        let crate::view::MenuItem::Node { children, .. } = &vm.menu[1] else {
            panic!("cloud menu should be a node");
        };
        let crate::view::MenuItem::Node {
            children: open_children,
            ..
        } = &children[1]
        else {
            panic!("cloud open should be a node");
        };
        assert!(open_children.is_empty());
    }
}
