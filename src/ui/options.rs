//! Options page: project CRUD, ordering, and fallback selection

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::project::Project;
use crate::settings::{DEFAULT_AUTHOR_PORT, DEFAULT_PUBLISH_PORT};
use crate::storage::{is_valid_port, is_valid_url, StoredSettings};
use uuid::Uuid;

// Import JS bridge functions
#[wasm_bindgen(module = "/options.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(value: JsValue) -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

/// Form buffer for adding or editing one project. An empty id means
/// the form creates a new project on save.
#[derive(Clone, PartialEq, Default)]
struct ProjectForm {
    id: String,
    name: String,
    pattern: String,
    author_port: String,
    publish_port: String,
    dispatcher_url: String,
    org_id: String,
    program_id: String,
}

impl ProjectForm {
    fn from_project(project: &Project) -> Self {
        let blank_default = |port: &str, default: &str| {
            if port == default {
                String::new()
            } else {
                port.to_string()
            }
        };

        ProjectForm {
            id: project.id.clone(),
            name: project.name.clone(),
            pattern: project.pattern.clone(),
            author_port: blank_default(&project.author_port, DEFAULT_AUTHOR_PORT),
            publish_port: blank_default(&project.publish_port, DEFAULT_PUBLISH_PORT),
            dispatcher_url: project.dispatcher_url.clone(),
            org_id: project.org_id.clone(),
            program_id: project.program_id.clone(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        if self.pattern.trim().is_empty() {
            return Err("URL pattern is required".to_string());
        }
        if !is_valid_port(&self.author_port) {
            return Err("Invalid author port. Please enter a number between 1 and 65535.".to_string());
        }
        if !is_valid_port(&self.publish_port) {
            return Err("Invalid publish port. Please enter a number between 1 and 65535.".to_string());
        }
        if !is_valid_url(&self.dispatcher_url) {
            return Err("Invalid dispatcher URL. Please enter a valid URL.".to_string());
        }
        Ok(())
    }

    /// Build the project to store. Blank ports are stored as the
    /// defaults so the record stays complete on its own.
    fn into_project(self) -> Project {
        let port_or = |port: String, default: &str| {
            let port = port.trim().to_string();
            if port.is_empty() {
                default.to_string()
            } else {
                port
            }
        };

        Project {
            id: if self.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                self.id
            },
            name: self.name.trim().to_string(),
            pattern: self.pattern.trim().to_string(),
            author_port: port_or(self.author_port, DEFAULT_AUTHOR_PORT),
            publish_port: port_or(self.publish_port, DEFAULT_PUBLISH_PORT),
            dispatcher_url: self.dispatcher_url.trim().to_string(),
            org_id: self.org_id.trim().to_string(),
            program_id: self.program_id.trim().to_string(),
            is_fallback: false,
        }
    }
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let state = use_state(|| ViewState::Loading);
    let settings = use_state(|| StoredSettings::new());
    let form = use_state(|| None::<ProjectForm>);
    let form_error = use_state(|| None::<String>);

    // Load stored settings on mount
    {
        let state = state.clone();
        let settings = settings.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_settings().await {
                    Ok(data) => {
                        settings.set(data);
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Open the form for a new project
    let on_add = {
        let form = form.clone();
        let form_error = form_error.clone();

        Callback::from(move |_| {
            form.set(Some(ProjectForm::default()));
            form_error.set(None);
        })
    };

    // Open the form with an existing project's values
    let on_edit = {
        let settings = settings.clone();
        let form = form.clone();
        let form_error = form_error.clone();

        Callback::from(move |project_id: String| {
            if let Some(project) = settings.project(&project_id) {
                form.set(Some(ProjectForm::from_project(project)));
                form_error.set(None);
            }
        })
    };

    // Save the form, inserting or replacing the project
    let on_form_submit = {
        let state = state.clone();
        let settings = settings.clone();
        let form = form.clone();
        let form_error = form_error.clone();

        Callback::from(move |_| {
            let Some(current) = (*form).clone() else {
                return;
            };

            if let Err(message) = current.validate() {
                form_error.set(Some(message));
                return;
            }

            let mut new_settings = (*settings).clone();
            new_settings.upsert_project(current.into_project());
            settings.set(new_settings.clone());
            form.set(None);
            form_error.set(None);

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_settings(&new_settings).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    let on_form_cancel = {
        let form = form.clone();
        let form_error = form_error.clone();

        Callback::from(move |_| {
            form.set(None);
            form_error.set(None);
        })
    };

    // Delete project handler
    let on_delete = {
        let state = state.clone();
        let settings = settings.clone();

        Callback::from(move |project_id: String| {
            let mut new_settings = (*settings).clone();
            new_settings.remove_project(&project_id);
            settings.set(new_settings.clone());

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_settings(&new_settings).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    // Reorder handler, moving a project one slot up or down
    let on_move = {
        let state = state.clone();
        let settings = settings.clone();

        Callback::from(move |(project_id, delta): (String, isize)| {
            let mut new_settings = (*settings).clone();
            if !new_settings.move_project(&project_id, delta) {
                return;
            }
            settings.set(new_settings.clone());

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_settings(&new_settings).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    // Fallback toggle handler
    let on_toggle_fallback = {
        let state = state.clone();
        let settings = settings.clone();

        Callback::from(move |(project_id, enabled): (String, bool)| {
            let mut new_settings = (*settings).clone();
            if !new_settings.set_fallback(&project_id, enabled) {
                return;
            }
            settings.set(new_settings.clone());

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_settings(&new_settings).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    // Form field updater
    let on_field = {
        let form = form.clone();

        move |apply: fn(&mut ProjectForm, String)| {
            let form = form.clone();
            Callback::from(move |e: InputEvent| {
                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                    if let Some(mut current) = (*form).clone() {
                        apply(&mut current, input.value());
                        form.set(Some(current));
                    }
                }
            })
        }
    };

    let project_count = settings.projects.len();

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"AEM QuickLinks Settings"}</h1>
                <Button onclick={on_add} disabled={form.is_some()}>
                    {"Add Project"}
                </Button>
            </div>

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading settings..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            // Project form
            if let Some(current) = (*form).clone() {
                <div class="project-form">
                    <h2 class="form-title">
                        {if current.id.is_empty() { "Add Project" } else { "Edit Project" }}
                    </h2>

                    if let Some(message) = (*form_error).clone() {
                        <Alert r#type={AlertType::Danger} title={message} inline={true}>
                        </Alert>
                    }

                    <div class="form-row">
                        <label class="form-label">{"Name"}</label>
                        <input
                            type="text"
                            value={current.name.clone()}
                            oninput={on_field(|f, v| f.name = v)}
                            placeholder="My Project"
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"URL pattern"}</label>
                        <input
                            type="text"
                            value={current.pattern.clone()}
                            oninput={on_field(|f, v| f.pattern = v)}
                            placeholder="*.example.com"
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"Author port"}</label>
                        <input
                            type="text"
                            value={current.author_port.clone()}
                            oninput={on_field(|f, v| f.author_port = v)}
                            placeholder={DEFAULT_AUTHOR_PORT}
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"Publish port"}</label>
                        <input
                            type="text"
                            value={current.publish_port.clone()}
                            oninput={on_field(|f, v| f.publish_port = v)}
                            placeholder={DEFAULT_PUBLISH_PORT}
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"Dispatcher URL"}</label>
                        <input
                            type="text"
                            value={current.dispatcher_url.clone()}
                            oninput={on_field(|f, v| f.dispatcher_url = v)}
                            placeholder="https://www.example.com"
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"Organization ID"}</label>
                        <input
                            type="text"
                            value={current.org_id.clone()}
                            oninput={on_field(|f, v| f.org_id = v)}
                            class="form-input"
                        />
                    </div>
                    <div class="form-row">
                        <label class="form-label">{"Program ID"}</label>
                        <input
                            type="text"
                            value={current.program_id.clone()}
                            oninput={on_field(|f, v| f.program_id = v)}
                            class="form-input"
                        />
                    </div>

                    <div class="form-actions">
                        <Button onclick={on_form_submit.clone()}>
                            {"Save Project"}
                        </Button>
                        <Button onclick={on_form_cancel.clone()} variant={ButtonVariant::Secondary}>
                            {"Cancel"}
                        </Button>
                    </div>
                </div>
            }

            // Projects list, highest match priority first
            if project_count == 0 && form.is_none() {
                <div class="empty-state">
                    <p>{"No projects configured yet."}</p>
                    <p class="empty-state-hint">{"Add a project to map hostnames to your AEM instances."}</p>
                </div>
            } else {
                <div class="projects-list">
                    {for settings.projects.iter().enumerate().map(|(index, project)| html! {
                        <ProjectCard
                            key={project.id.clone()}
                            project={project.clone()}
                            is_first={index == 0}
                            is_last={index + 1 == project_count}
                            on_edit={on_edit.clone()}
                            on_delete={on_delete.clone()}
                            on_move={on_move.clone()}
                            on_toggle_fallback={on_toggle_fallback.clone()}
                        />
                    })}
                </div>
            }
        </div>
    }
}

// Project card component
#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    project: Project,
    is_first: bool,
    is_last: bool,
    on_edit: Callback<String>,
    on_delete: Callback<String>,
    on_move: Callback<(String, isize)>,
    on_toggle_fallback: Callback<(String, bool)>,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let project = &props.project;

    let author_port = if project.author_port.is_empty() {
        DEFAULT_AUTHOR_PORT
    } else {
        &project.author_port
    };
    let publish_port = if project.publish_port.is_empty() {
        DEFAULT_PUBLISH_PORT
    } else {
        &project.publish_port
    };

    let on_fallback_change = props.on_toggle_fallback.reform({
        let project_id = project.id.clone();
        move |e: Event| {
            let enabled = e
                .target_dyn_into::<HtmlInputElement>()
                .map(|input| input.checked())
                .unwrap_or(false);
            (project_id.clone(), enabled)
        }
    });

    html! {
        <div class="project-card">
            <div class="project-header">
                <div class="project-title-container">
                    <h3 class="project-title">{&project.name}</h3>
                    <p class="project-pattern">{&project.pattern}</p>
                    <p class="project-detail">
                        {format!("Author {} • Publish {}", author_port, publish_port)}
                    </p>
                    if !project.dispatcher_url.is_empty() {
                        <p class="project-detail">{format!("Dispatcher: {}", project.dispatcher_url)}</p>
                    }
                    if !project.org_id.is_empty() || !project.program_id.is_empty() {
                        <p class="project-detail">
                            {format!("Cloud: org {} / program {}", project.org_id, project.program_id)}
                        </p>
                    }
                </div>

                <div class="project-actions">
                    <Button
                        onclick={props.on_move.reform({
                            let project_id = project.id.clone();
                            move |_| (project_id.clone(), -1)
                        })}
                        disabled={props.is_first}
                        variant={ButtonVariant::Secondary}
                        size={ButtonSize::Small}
                    >
                        {"▲"}
                    </Button>
                    <Button
                        onclick={props.on_move.reform({
                            let project_id = project.id.clone();
                            move |_| (project_id.clone(), 1)
                        })}
                        disabled={props.is_last}
                        variant={ButtonVariant::Secondary}
                        size={ButtonSize::Small}
                    >
                        {"▼"}
                    </Button>
                    <Button
                        onclick={props.on_edit.reform({
                            let project_id = project.id.clone();
                            move |_| project_id.clone()
                        })}
                        variant={ButtonVariant::Secondary}
                        size={ButtonSize::Small}
                    >
                        {"Edit"}
                    </Button>
                    <Button
                        onclick={props.on_delete.reform({
                            let project_id = project.id.clone();
                            move |_| project_id.clone()
                        })}
                        variant={ButtonVariant::Danger}
                        size={ButtonSize::Small}
                    >
                        {"Delete"}
                    </Button>
                </div>
            </div>

            <label class="fallback-toggle">
                <input
                    type="checkbox"
                    checked={project.is_fallback}
                    onchange={on_fallback_change}
                />
                {"Fallback when no project matches"}
            </label>
        </div>
    }
}

// Helper functions

async fn load_settings() -> Result<StoredSettings, String> {
    let settings_js = getStorage()
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    if settings_js.is_null() || settings_js.is_undefined() {
        Ok(StoredSettings::new())
    } else {
        serde_wasm_bindgen::from_value(settings_js)
            .map_err(|e| format!("Failed to parse storage: {:?}", e))
    }
}

async fn save_settings(settings: &StoredSettings) -> Result<(), String> {
    let settings_js = serde_wasm_bindgen::to_value(settings)
        .map_err(|e| format!("Failed to serialize settings: {:?}", e))?;

    setStorage(settings_js)
        .await
        .map_err(|e| format!("Failed to save settings: {:?}", e))
}
