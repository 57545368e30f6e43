/// Popup UI for Consumer Rights Check

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::Config;
use crate::host::HostHandle;
use crate::lookup::LookupClient;
use crate::popup::{PopupState, PopupView, resolve};
use crate::ui::components::{FindingList, StatusBanner};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub host: HostHandle,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_state(|| PopupState::Idle);
    let company_name = use_state(|| None::<String>);

    // Resolve the active tab once on mount
    {
        let state = state.clone();
        let company_name = company_name.clone();
        let host = props.host.clone();

        use_effect_with((), move |_| {
            state.set(PopupState::Loading);

            spawn_local(async move {
                let client = LookupClient::with_fetch(Config::load(&*host.0).await);
                let resolved = resolve(&*host.0, &client).await;

                company_name.set(resolved.company_name);
                state.set(resolved.state);
            });
            || ()
        });
    }

    let view = PopupView::new(company_name.as_deref(), &state);
    let is_busy = matches!(*state, PopupState::Idle | PopupState::Loading);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Consumer Rights Check"}</h1>

            if !is_busy {
                <p id="domainName" class="domain-name">{&view.subtitle}</p>
            }

            <StatusBanner tone={view.tone} message={view.message.clone()} />

            <FindingList findings={view.findings.clone()} visible={view.show_list} />

            <p class="footer-popup">
                {"Consumer Rights Check v0.1.0"}
            </p>
        </div>
    }
}
