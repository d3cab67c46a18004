//! Popup UI: searchable quick-link menus for the active tab

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::cloud::CloudTool;
use crate::quicklinks::{plan, QuickLink};
use crate::settings::effective_settings;
use crate::storage::StoredSettings;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openOptionsPage() -> Result<(), JsValue>;

    fn closePopup();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Menu {
    Main,
    CurrentPage,
    Cloud,
}

/// One popup action: which menu it lives in, its button label, and the
/// status message shown while its tab opens.
#[derive(Debug, PartialEq)]
struct ActionEntry {
    menu: Menu,
    label: &'static str,
    message: &'static str,
    link: QuickLink,
}

const ACTIONS: &[ActionEntry] = &[
    ActionEntry {
        menu: Menu::Main,
        label: "CRXDE Lite",
        message: "Opening CRXDE...",
        link: QuickLink::Crxde,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Package Manager",
        message: "Opening Package Manager...",
        link: QuickLink::PackageManager,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Config Manager",
        message: "Opening Config Manager...",
        link: QuickLink::ConfigManager,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Groovy Console",
        message: "Opening Groovy Console...",
        link: QuickLink::GroovyConsole,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Replication Agent",
        message: "Opening Replication Default Agent...",
        link: QuickLink::ReplicationAgent,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Login on Publish",
        message: "Opening Login on Publish...",
        link: QuickLink::LoginPublish,
    },
    ActionEntry {
        menu: Menu::Main,
        label: "Dispatcher",
        message: "Opening dispatcher...",
        link: QuickLink::Dispatcher,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "CRXDE for Current Page",
        message: "Opening CRXDE for current page...",
        link: QuickLink::CrxdeCurrentPage,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Edit View",
        message: "Opening edit view for current page...",
        link: QuickLink::EditView,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "View as Published",
        message: "Opening as published...",
        link: QuickLink::ViewAsPublished,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Open on Publish",
        message: "Opening publish for current page...",
        link: QuickLink::OpenPublish,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Open on Author",
        message: "Opening author for current page...",
        link: QuickLink::OpenAuthor,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Page Properties",
        message: "Opening page properties...",
        link: QuickLink::PageProperties,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Sling Model JSON",
        message: "Opening Sling Model Exporter...",
        link: QuickLink::SlingModelJson,
    },
    ActionEntry {
        menu: Menu::CurrentPage,
        label: "Dispatcher for Current Page",
        message: "Opening dispatcher...",
        link: QuickLink::DispatcherCurrentPage,
    },
    ActionEntry {
        menu: Menu::Cloud,
        label: "Cloud Manager Home",
        message: "Opening Cloud Manager Home...",
        link: QuickLink::Cloud(CloudTool::Home),
    },
    ActionEntry {
        menu: Menu::Cloud,
        label: "Environment Details",
        message: "Opening Environment Details...",
        link: QuickLink::Cloud(CloudTool::EnvironmentDetails),
    },
    ActionEntry {
        menu: Menu::Cloud,
        label: "Environments",
        message: "Opening Environments...",
        link: QuickLink::Cloud(CloudTool::Environments),
    },
    ActionEntry {
        menu: Menu::Cloud,
        label: "Pipelines",
        message: "Opening Pipelines...",
        link: QuickLink::Cloud(CloudTool::Pipelines),
    },
    ActionEntry {
        menu: Menu::Cloud,
        label: "Activity",
        message: "Opening Activity...",
        link: QuickLink::Cloud(CloudTool::Activity),
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Row {
    Action(&'static ActionEntry),
    OpenMenu(Menu, &'static str),
    Back,
}

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Idle,
    Opening(String),
    Error(String, bool), // message, offer settings link
}

/// Rows to render for the current menu and search query.
///
/// An active query searches every action across all menus and hides
/// the menu openers and back row; otherwise the current menu's actions
/// are listed, with a back row first on submenus and the submenu
/// openers last on the main menu.
fn visible_rows(menu: Menu, query: &str) -> Vec<Row> {
    let query = query.trim().to_lowercase();

    if !query.is_empty() {
        return ACTIONS
            .iter()
            .filter(|entry| entry.label.to_lowercase().contains(&query))
            .map(Row::Action)
            .collect();
    }

    let mut rows = Vec::new();
    if menu != Menu::Main {
        rows.push(Row::Back);
    }
    rows.extend(
        ACTIONS
            .iter()
            .filter(|entry| entry.menu == menu)
            .map(Row::Action),
    );
    if menu == Menu::Main {
        rows.push(Row::OpenMenu(Menu::CurrentPage, "Current Page Tools ▸"));
        rows.push(Row::OpenMenu(Menu::Cloud, "AEM Cloud ▸"));
    }

    rows
}

/// Keyboard navigation over `len` rows. Arrows wrap around the list,
/// page movement is clamped. Keys that do not move the selection
/// return `None`.
fn next_selection(key: &str, selected: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match key {
        "ArrowDown" => Some((selected + 1) % len),
        "ArrowUp" => Some((selected + len - 1) % len),
        "Home" => Some(0),
        "End" => Some(len - 1),
        "PageDown" => Some((selected + 5).min(len - 1)),
        "PageUp" => Some(selected.saturating_sub(5)),
        _ => None,
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let settings = use_state(|| StoredSettings::new());
    let tab_url = use_state(|| None::<String>);
    let menu = use_state(|| Menu::Main);
    let query = use_state(|| String::new());
    let selected = use_state(|| 0usize);

    // Load the active tab URL and stored settings on mount
    {
        let state = state.clone();
        let settings = settings.clone();
        let tab_url = tab_url.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                tab_url.set(fetch_active_tab_url().await);
                settings.set(load_settings().await);
                state.set(PopupState::Idle);
            });
            || ()
        });
    }

    // Row activation: submenu navigation or opening the planned URL
    let on_activate = {
        let state = state.clone();
        let settings = settings.clone();
        let tab_url = tab_url.clone();
        let menu = menu.clone();
        let selected = selected.clone();

        Callback::from(move |row: Row| match row {
            Row::OpenMenu(target, _) => {
                menu.set(target);
                selected.set(0);
            }
            Row::Back => {
                menu.set(Menu::Main);
                selected.set(0);
            }
            Row::Action(entry) => {
                let defaults = settings.port_defaults();
                let effective =
                    effective_settings((*tab_url).as_deref(), &settings.projects, &defaults);

                match plan(entry.link, (*tab_url).as_deref(), &effective) {
                    Ok(url) => {
                        state.set(PopupState::Opening(entry.message.to_string()));
                        spawn_local(async move {
                            if let Err(e) = createTab(&url).await {
                                log::warn!("Failed to open tab: {:?}", e);
                            }
                            closePopup();
                        });
                    }
                    Err(e) => {
                        state.set(PopupState::Error(e.to_string(), e.needs_settings()));
                    }
                }
            }
        })
    };

    // Search input
    let on_search_input = {
        let query = query.clone();
        let selected = selected.clone();

        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
                selected.set(0);
            }
        })
    };

    // Keyboard navigation over the visible rows
    let on_keydown = {
        let menu = menu.clone();
        let query = query.clone();
        let selected = selected.clone();
        let on_activate = on_activate.clone();

        Callback::from(move |e: KeyboardEvent| {
            let rows = visible_rows(*menu, &query);
            let key = e.key();

            if let Some(next) = next_selection(&key, *selected, rows.len()) {
                e.prevent_default();
                selected.set(next);
                return;
            }

            match key.as_str() {
                "Enter" => {
                    e.prevent_default();
                    if let Some(row) = rows.get(*selected) {
                        on_activate.emit(*row);
                    }
                }
                "Escape" => {
                    if *menu != Menu::Main {
                        menu.set(Menu::Main);
                        selected.set(0);
                    } else if !query.is_empty() {
                        query.set(String::new());
                        selected.set(0);
                    } else {
                        closePopup();
                    }
                }
                _ => {}
            }
        })
    };

    let on_open_settings = {
        Callback::from(move |_| {
            spawn_local(async move {
                let _ = openOptionsPage().await;
            });
        })
    };

    let rows = visible_rows(*menu, &query);
    let is_busy = matches!(*state, PopupState::Loading | PopupState::Opening(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"AEM QuickLinks"}</h1>

            // Search bar
            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search tools..."
                    value={(*query).clone()}
                    oninput={on_search_input}
                    onkeydown={on_keydown}
                    autofocus=true
                    class="search-input"
                />
            </div>

            // Status display
            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Opening(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                PopupState::Error(err, needs_settings) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                        if *needs_settings {
                            <Button onclick={on_open_settings.clone()} variant={ButtonVariant::Secondary} block={true}>
                                {"Open Settings"}
                            </Button>
                        }
                    </div>
                },
                PopupState::Idle => html! {}
            }}

            // Action rows
            if rows.is_empty() {
                <div class="empty-state">
                    <p>{"No tools match your search."}</p>
                </div>
            } else {
                <div class="flex-column-gap">
                    {for rows.iter().enumerate().map(|(index, row)| {
                        let label = match row {
                            Row::Action(entry) => entry.label,
                            Row::OpenMenu(_, label) => label,
                            Row::Back => "◂ Back",
                        };
                        let class = if index == *selected {
                            "action-row selected"
                        } else {
                            "action-row"
                        };
                        let row = *row;

                        html! {
                            <div key={label} class={class}>
                                <Button
                                    onclick={on_activate.reform(move |_| row)}
                                    disabled={is_busy}
                                    variant={ButtonVariant::Secondary}
                                    block={true}
                                >
                                    {label}
                                </Button>
                            </div>
                        }
                    })}
                </div>
            }

            <p class="footer-popup">
                {"AEM QuickLinks v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

async fn fetch_active_tab_url() -> Option<String> {
    match getActiveTabUrl().await {
        Ok(url) => url.as_string().filter(|u| !u.is_empty()),
        Err(e) => {
            log::warn!("Failed to get active tab: {:?}", e);
            None
        }
    }
}

/// Stored settings, or the empty default when storage is missing or
/// unreadable. The popup stays usable either way.
async fn load_settings() -> StoredSettings {
    match getStorage().await {
        Ok(settings_js) => {
            if settings_js.is_null() || settings_js.is_undefined() {
                StoredSettings::new()
            } else {
                serde_wasm_bindgen::from_value(settings_js).unwrap_or_else(|e| {
                    log::warn!("Failed to parse stored settings: {:?}", e);
                    StoredSettings::new()
                })
            }
        }
        Err(e) => {
            log::warn!("Failed to read storage: {:?}", e);
            StoredSettings::new()
        }
    }
}
