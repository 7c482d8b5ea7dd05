/// Popup UI for the site scratchpad extension

use crate::host::{normalize_filter, site_url};
use crate::records::SiteStore;
use crate::site_data::{FileRef, SiteRecord};
use crate::storage::StoreError;
use crate::ui::bridge::{copy_to_clipboard, open_in_new_tab, resolve_active_host, ChromeStore};
use crate::ui::components::{FileItem, TaskItem};
use crate::ui::debounce::Debouncer;
use crate::ui::session::{AppState, Edit, PopupSession, SessionAction, View};
use crate::ui::site_list::SiteList;
use patternfly_yew::prelude::*;
use std::fmt::Display;
use std::future::Future;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

fn site_store() -> SiteStore<ChromeStore> {
    SiteStore::new(ChromeStore)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// State handles the async handlers write back into
#[derive(Clone)]
struct Editor {
    state: UseStateHandle<AppState>,
    session: UseReducerHandle<PopupSession>,
    record: UseStateHandle<SiteRecord>,
    notes: UseStateHandle<String>,
    hosts: UseStateHandle<Vec<String>>,
    filter: UseStateHandle<String>,
}

impl Editor {
    /// Load a whole record, notes box included
    fn show(&self, record: SiteRecord) {
        self.notes.set(record.notes.clone());
        self.record.set(record);
    }

    /// Record the outcome of an operation, returning its value on success
    fn settle<T, E: Display>(&self, result: Result<T, E>, context: &str) -> Option<T> {
        let next = AppState::settled(&result, context);
        if let AppState::Error(message) = &next {
            log::error!("{}", message);
        }
        self.state.set(next);
        result.ok()
    }

    /// Re-read the site list and the active tab behind its indicator
    async fn refresh_hosts(&self) {
        self.session.dispatch(SessionAction::ActiveTab(resolve_active_host().await));

        let hosts = site_store().list_hosts(&normalize_filter(&self.filter)).await;
        if let Some(hosts) = self.settle(hosts, "Failed to list sites") {
            self.hosts.set(hosts);
        }
    }

    /// Load `host` into the editor and switch to the main view
    async fn select_host(&self, host: String) {
        let record = site_store().get_record(&host).await;
        if let Some(record) = self.settle(record, &format!("Failed to load {}", host)) {
            self.show(record);
            self.session.dispatch(SessionAction::Select(host));
        }
    }

    /// Run a record mutation, redraw what it touched and refresh the site list
    fn mutate<F, Fut>(&self, edit: Edit, op: F)
    where
        F: FnOnce(SiteStore<ChromeStore>) -> Fut + 'static,
        Fut: Future<Output = Result<SiteRecord, StoreError>> + 'static,
    {
        let editor = self.clone();
        spawn_local(async move {
            let result = op(site_store()).await;
            if let Some(record) = editor.settle(result, "Failed to save") {
                if edit.reloads_notes() {
                    editor.show(record);
                } else {
                    editor.record.set(record);
                }
                editor.refresh_hosts().await;
            }
        });
    }

    fn current_host(&self) -> Option<String> {
        self.session.current_host.clone()
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading...".to_string()));
    let session = use_reducer(PopupSession::default);
    let record = use_state(SiteRecord::new);
    let notes = use_state(String::new);
    let hosts = use_state(Vec::<String>::new);
    let filter = use_state(String::new);
    let task_input = use_state(String::new);
    let menu_open = use_state(|| false);
    let debouncer = use_mut_ref(Debouncer::new);

    let editor = Editor {
        state: state.clone(),
        session: session.clone(),
        record: record.clone(),
        notes: notes.clone(),
        hosts: hosts.clone(),
        filter: filter.clone(),
    };

    // Startup: migrate old keys, then show the active tab's host
    {
        let editor = editor.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let store = site_store();
                let active = resolve_active_host().await;

                if let Err(e) = store.migrate_legacy().await {
                    log::warn!("Legacy migration failed: {}", e);
                }

                let Some(saved) = editor.settle(store.list_hosts("").await, "Failed to load sites") else {
                    return;
                };

                let host = PopupSession::startup_host(active.as_deref(), &saved);
                if let Some(host) = &host {
                    let record = store.get_record(host).await;
                    let Some(record) = editor.settle(record, &format!("Failed to load {}", host)) else {
                        return;
                    };
                    editor.show(record);
                }

                editor.session.dispatch(SessionAction::Start {
                    active_tab_host: active,
                    host,
                });
                editor.hosts.set(saved);
            });
            || ()
        });
    }

    // Menu
    let on_menu_toggle = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            menu_open.set(!*menu_open);
        })
    };

    let on_backdrop = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let on_menu_home = {
        let menu_open = menu_open.clone();
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
            let editor = editor.clone();
            spawn_local(async move {
                let Some(host) = resolve_active_host().await else {
                    alert("No active tab with valid hostname.");
                    return;
                };
                let created = site_store().ensure_exists(&host).await;
                if editor
                    .settle(created, &format!("Failed to create record for {}", host))
                    .is_none()
                {
                    return;
                }

                editor.select_host(host).await;
                editor.refresh_hosts().await;
            });
        })
    };

    let on_menu_lists = {
        let menu_open = menu_open.clone();
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
            editor.filter.set(String::new());
            editor.session.dispatch(SessionAction::ShowList);

            let editor = editor.clone();
            spawn_local(async move {
                let hosts = site_store().list_hosts("").await;
                if let Some(hosts) = editor.settle(hosts, "Failed to list sites") {
                    editor.hosts.set(hosts);
                }
                editor
                    .session
                    .dispatch(SessionAction::ActiveTab(resolve_active_host().await));
            });
        })
    };

    // Site list page
    let on_back = {
        let session = session.clone();
        Callback::from(move |_: ()| session.dispatch(SessionAction::ShowMain))
    };

    let on_filter = {
        let editor = editor.clone();
        Callback::from(move |raw: String| {
            editor.filter.set(raw.clone());
            let editor = editor.clone();
            spawn_local(async move {
                let hosts = site_store().list_hosts(&normalize_filter(&raw)).await;
                if let Some(hosts) = editor.settle(hosts, "Failed to filter sites") {
                    editor.hosts.set(hosts);
                }
            });
        })
    };

    let on_select = {
        let editor = editor.clone();
        Callback::from(move |host: String| {
            let editor = editor.clone();
            spawn_local(async move {
                editor.select_host(host).await;
            });
        })
    };

    let on_open = {
        let editor = editor.clone();
        Callback::from(move |host: String| {
            let url = site_url(&site_store().config().open_scheme, &host);
            let editor = editor.clone();
            spawn_local(async move {
                editor.settle(open_in_new_tab(&url).await, "Failed to open site");
            });
        })
    };

    // Site header
    let on_open_current = {
        let editor = editor.clone();
        let on_open = on_open.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(host) = editor.current_host() {
                on_open.emit(host);
            }
        })
    };

    let on_remove_site = {
        let editor = editor.clone();
        let debouncer = debouncer.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(host) = editor.current_host() else {
                return;
            };
            if !confirm(&format!("Delete ALL data for {}?", host)) {
                return;
            }
            debouncer.borrow_mut().cancel();

            let editor = editor.clone();
            spawn_local(async move {
                let store = site_store();
                let removed = store.remove_host(&host).await;
                if editor
                    .settle(removed, &format!("Failed to remove {}", host))
                    .is_none()
                {
                    return;
                }

                let Some(remaining) = editor.settle(store.list_hosts("").await, "Failed to list sites") else {
                    return;
                };

                match PopupSession::host_after_removal(&remaining) {
                    Some(next) => {
                        let record = store.get_record(&next).await;
                        if let Some(record) = editor.settle(record, &format!("Failed to load {}", next)) {
                            editor.show(record);
                        }
                    }
                    None => editor.show(SiteRecord::new()),
                }
                editor.session.dispatch(SessionAction::Removed(remaining));
                editor.refresh_hosts().await;
            });
        })
    };

    // Tasks
    let on_task_input = {
        let task_input = task_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                task_input.set(input.value());
            }
        })
    };

    let on_task_keydown = {
        let task_input = task_input.clone();
        let editor = editor.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() != "Enter" {
                return;
            }
            let text = task_input.trim().to_string();
            if text.is_empty() {
                return;
            }
            task_input.set(String::new());

            let editor = editor.clone();
            spawn_local(async move {
                let host = match editor.current_host() {
                    Some(host) => host,
                    None => {
                        let Some(host) = resolve_active_host().await else {
                            alert("No valid active tab.");
                            return;
                        };
                        let created = site_store().ensure_exists(&host).await;
                        if editor
                            .settle(created, &format!("Failed to create record for {}", host))
                            .is_none()
                        {
                            return;
                        }
                        editor.session.dispatch(SessionAction::Select(host.clone()));
                        host
                    }
                };

                editor.mutate(Edit::AddTask, move |store| async move {
                    store.add_task(&host, &text).await
                });
            });
        })
    };

    let on_toggle_task = {
        let editor = editor.clone();
        Callback::from(move |index: usize| {
            if let Some(host) = editor.current_host() {
                editor.mutate(Edit::ToggleTask, move |store| async move {
                    store.toggle_task(&host, index).await
                });
            }
        })
    };

    let on_delete_task = {
        let editor = editor.clone();
        Callback::from(move |index: usize| {
            if let Some(host) = editor.current_host() {
                editor.mutate(Edit::DeleteTask, move |store| async move {
                    store.delete_task(&host, index).await
                });
            }
        })
    };

    let on_copy_task = {
        let editor = editor.clone();
        Callback::from(move |text: String| {
            let editor = editor.clone();
            spawn_local(async move {
                editor.settle(copy_to_clipboard(&text).await, "Failed to copy task");
            });
        })
    };

    let on_copy_tasks = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            if editor.current_host().is_none() {
                alert("No site selected");
                return;
            }
            let text = editor.record.tasks_as_text();
            let editor = editor.clone();
            spawn_local(async move {
                if editor
                    .settle(copy_to_clipboard(&text).await, "Failed to copy tasks")
                    .is_some()
                {
                    alert("Tasks copied.");
                }
            });
        })
    };

    let on_clear_tasks = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(host) = editor.current_host() else {
                return;
            };
            if !confirm(&format!("Clear all tasks for {}?", host)) {
                return;
            }
            editor.mutate(Edit::ClearTasks, move |store| async move {
                store.clear_tasks(&host).await
            });
        })
    };

    // Notes
    let on_notes_input = {
        let editor = editor.clone();
        let debouncer = debouncer.clone();
        Callback::from(move |e: InputEvent| {
            let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() else {
                return;
            };
            let text = area.value();
            editor.notes.set(text.clone());

            // The host is fixed now so a late save never lands on another site
            let Some(host) = editor.current_host() else {
                return;
            };
            let delay = site_store().config().notes_debounce_ms;
            let editor = editor.clone();
            debouncer.borrow_mut().schedule(delay, move || {
                spawn_local(async move {
                    let saved = site_store().update_notes(&host, &text).await;
                    if editor.settle(saved, "Failed to save notes").is_some() {
                        editor.refresh_hosts().await;
                    }
                });
            });
        })
    };

    let on_copy_notes = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            let text = (*editor.notes).clone();
            let editor = editor.clone();
            spawn_local(async move {
                if editor
                    .settle(copy_to_clipboard(&text).await, "Failed to copy notes")
                    .is_some()
                {
                    alert("Notes copied.");
                }
            });
        })
    };

    let on_clear_notes = {
        let editor = editor.clone();
        let debouncer = debouncer.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(host) = editor.current_host() else {
                return;
            };
            if !confirm(&format!("Clear notes for {}?", host)) {
                return;
            }
            debouncer.borrow_mut().cancel();
            editor.mutate(Edit::ClearNotes, move |store| async move {
                store.clear_notes(&host).await
            });
        })
    };

    // Files
    let on_files_change = {
        let editor = editor.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let files: Vec<FileRef> = input
                .files()
                .map(|list| {
                    (0..list.length())
                        .filter_map(|i| list.get(i))
                        .map(|file| FileRef::new(file.name(), file.size() as u64))
                        .collect()
                })
                .unwrap_or_default();
            input.set_value("");

            let Some(host) = editor.current_host() else {
                return;
            };
            if files.is_empty() {
                return;
            }
            editor.mutate(Edit::AddFiles, move |store| async move {
                store.add_files(&host, &files).await
            });
        })
    };

    let on_delete_file = {
        let editor = editor.clone();
        Callback::from(move |index: usize| {
            if let Some(host) = editor.current_host() {
                editor.mutate(Edit::DeleteFile, move |store| async move {
                    store.delete_file(&host, index).await
                });
            }
        })
    };

    let has_host = session.current_host.is_some();

    html! {
        <div class="popup">
            <header class="topbar">
                <button
                    class={if *menu_open { "hamburger open" } else { "hamburger" }}
                    onclick={on_menu_toggle}
                >
                    {"☰"}
                </button>
                <h1 class="title-host">{session.title()}</h1>
            </header>

            if *menu_open {
                <div class="menu-backdrop" onclick={on_backdrop}></div>
            }
            <nav
                class={if *menu_open { "hamburger-menu show" } else { "hamburger-menu" }}
                aria-hidden={(!*menu_open).to_string()}
            >
                <button class="menu-item" onclick={on_menu_home}>{"Current tab"}</button>
                <button class="menu-item" onclick={on_menu_lists}>{"Saved sites"}</button>
            </nav>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            {match session.view {
                View::SiteList => html! {
                    <SiteList
                        hosts={(*hosts).clone()}
                        filter={(*filter).clone()}
                        session={(*session).clone()}
                        on_filter={on_filter}
                        on_select={on_select}
                        on_open={on_open}
                        on_back={on_back}
                    />
                },
                View::Main => html! {
                    <div class="main-page">
                        <div class="site-actions">
                            <Button onclick={on_open_current} disabled={!has_host} variant={ButtonVariant::Secondary}>
                                {"↗ Open site"}
                            </Button>
                            <Button onclick={on_remove_site} disabled={!has_host} variant={ButtonVariant::Danger}>
                                {"🗑️ Remove site"}
                            </Button>
                        </div>

                        <section class="section">
                            <div class="section-header">
                                <h2 class="section-title">{"Tasks"}</h2>
                                <Button onclick={on_copy_tasks} variant={ButtonVariant::Plain}>{"📋"}</Button>
                                <Button onclick={on_clear_tasks} variant={ButtonVariant::Plain}>{"🧹"}</Button>
                            </div>
                            <input
                                type="text"
                                class="task-input"
                                placeholder="Add a task and press Enter"
                                value={(*task_input).clone()}
                                oninput={on_task_input}
                                onkeydown={on_task_keydown}
                            />
                            <div class="task-list">
                                {for record.tasks.iter().enumerate().map(|(index, task)| html! {
                                    <TaskItem
                                        index={index}
                                        task={task.clone()}
                                        on_toggle={on_toggle_task.clone()}
                                        on_copy={on_copy_task.clone()}
                                        on_delete={on_delete_task.clone()}
                                    />
                                })}
                            </div>
                        </section>

                        <section class="section">
                            <div class="section-header">
                                <h2 class="section-title">{"Notes"}</h2>
                                <Button onclick={on_copy_notes} variant={ButtonVariant::Plain}>{"📋"}</Button>
                                <Button onclick={on_clear_notes} variant={ButtonVariant::Plain}>{"🧹"}</Button>
                            </div>
                            <textarea
                                class="notes-text"
                                value={(*notes).clone()}
                                oninput={on_notes_input}
                            />
                        </section>

                        <section class="section">
                            <div class="section-header">
                                <h2 class="section-title">{"Files"}</h2>
                            </div>
                            <input type="file" multiple={true} onchange={on_files_change} />
                            <ul class="file-list">
                                {for record.files.iter().enumerate().map(|(index, file)| html! {
                                    <FileItem
                                        index={index}
                                        file={file.clone()}
                                        on_delete={on_delete_file.clone()}
                                    />
                                })}
                            </ul>
                        </section>
                    </div>
                },
            }}

            <p class="footer-popup">
                {"Site Scratchpad v0.1.0"}
            </p>
        </div>
    }
}
