/// Saved sites page: filterable list of every host with a record

use crate::ui::components::SiteItem;
use crate::ui::session::PopupSession;
use patternfly_yew::prelude::*;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SiteListProps {
    /// Hosts already filtered and sorted by the store
    pub hosts: Vec<String>,
    pub filter: String,
    pub session: PopupSession,
    pub on_filter: Callback<String>,
    pub on_select: Callback<String>,
    pub on_open: Callback<String>,
    pub on_back: Callback<()>,
}

#[function_component(SiteList)]
pub fn site_list(props: &SiteListProps) -> Html {
    let on_filter_input = {
        let on_filter = props.on_filter.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_filter.emit(input.value());
            }
        })
    };

    html! {
        <div class="list-page">
            <div class="list-header">
                <Button onclick={props.on_back.reform(|_: MouseEvent| ())} variant={ButtonVariant::Link}>
                    {"← Back"}
                </Button>
                <h2 class="list-title">{"Saved sites"}</h2>
            </div>

            <input
                type="text"
                class="search-input"
                placeholder="Filter sites..."
                value={props.filter.clone()}
                oninput={on_filter_input}
            />

            if props.hosts.is_empty() {
                <div class="tiny muted">{"No saved sites yet."}</div>
            } else {
                <ul class="sites-list">
                    {for props.hosts.iter().map(|host| html! {
                        <SiteItem
                            key={host.clone()}
                            host={host.clone()}
                            is_active_tab={props.session.is_active_tab(host)}
                            is_current={props.session.is_current(host)}
                            on_select={props.on_select.clone()}
                            on_open={props.on_open.clone()}
                        />
                    })}
                </ul>
            }
        </div>
    }
}
