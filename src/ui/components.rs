/// Reusable UI rows for tasks, files and saved sites

use crate::site_data::{FileRef, Task};
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TaskItemProps {
    pub index: usize,
    pub task: Task,
    pub on_toggle: Callback<usize>,
    pub on_copy: Callback<String>,
    pub on_delete: Callback<usize>,
}

#[function_component(TaskItem)]
pub fn task_item(props: &TaskItemProps) -> Html {
    let index = props.index;
    let text = props.task.text.clone();

    html! {
        <div class={if props.task.done { "task-item task-done" } else { "task-item" }}>
            <input
                type="checkbox"
                checked={props.task.done}
                onchange={props.on_toggle.reform(move |_: Event| index)}
            />
            <span class="task-text">{&props.task.text}</span>
            <Button
                onclick={props.on_copy.reform(move |_: MouseEvent| text.clone())}
                variant={ButtonVariant::Plain}
            >
                {"📋"}
            </Button>
            <Button
                onclick={props.on_delete.reform(move |_: MouseEvent| index)}
                variant={ButtonVariant::Plain}
            >
                {"✖"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FileItemProps {
    pub index: usize,
    pub file: FileRef,
    pub on_delete: Callback<usize>,
}

#[function_component(FileItem)]
pub fn file_item(props: &FileItemProps) -> Html {
    let index = props.index;

    html! {
        <li class="file-item">
            <span>{format!("{} ({})", props.file.name, props.file.size_label())}</span>
            <Button
                onclick={props.on_delete.reform(move |_: MouseEvent| index)}
                variant={ButtonVariant::Plain}
            >
                {"✖"}
            </Button>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct SiteItemProps {
    pub host: String,
    /// Host is open in the browser's active tab
    pub is_active_tab: bool,
    /// Host is the one shown in the editor
    pub is_current: bool,
    pub on_select: Callback<String>,
    pub on_open: Callback<String>,
}

#[function_component(SiteItem)]
pub fn site_item(props: &SiteItemProps) -> Html {
    let on_click = {
        let host = props.host.clone();
        props.on_select.reform(move |_: MouseEvent| host.clone())
    };

    let on_open = {
        let host = props.host.clone();
        let on_open = props.on_open.clone();
        Callback::from(move |e: MouseEvent| {
            // Keep the row click from also selecting the host
            e.stop_propagation();
            on_open.emit(host.clone());
        })
    };

    html! {
        <li class={if props.is_current { "site-item active" } else { "site-item" }} onclick={on_click}>
            <div class="host">
                <span class="host-name">{&props.host}</span>
                <div class="tiny muted">{"View / Edit"}</div>
            </div>
            <div class="site-actions">
                if props.is_active_tab {
                    <div class="active-tab-indicator"></div>
                }
                <button class="open-site" onclick={on_open}>{"↗"}</button>
            </div>
        </li>
    }
}
