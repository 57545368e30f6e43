/// Reusable UI components

use patternfly_yew::prelude::*;
use yew::prelude::*;

use crate::popup::Tone;
use crate::tab_data::Finding;

#[derive(Properties, PartialEq)]
pub struct StatusBannerProps {
    pub tone: Tone,
    pub message: String,
}

#[function_component(StatusBanner)]
pub fn status_banner(props: &StatusBannerProps) -> Html {
    let body = match props.tone {
        Tone::Loading => html! {
            <div class="loading-text-center">
                <Spinner />
                <p class="loading-text">{&props.message}</p>
            </div>
        },
        Tone::Warning => html! {
            <Alert r#type={AlertType::Danger} title={props.message.clone()} inline={true}>
            </Alert>
        },
        Tone::Offline => html! {
            <Alert r#type={AlertType::Warning} title={props.message.clone()} inline={true}>
            </Alert>
        },
        Tone::Clean => html! {
            <Alert r#type={AlertType::Success} title={props.message.clone()} inline={true}>
            </Alert>
        },
    };

    html! {
        <div id="status" class={props.tone.class()}>
            {body}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FindingListProps {
    pub findings: Vec<Finding>,
    #[prop_or(true)]
    pub visible: bool,
}

/// Article list. Titles and snippets come from the wiki and are rendered
/// as text nodes only.
#[function_component(FindingList)]
pub fn finding_list(props: &FindingListProps) -> Html {
    let style = if props.visible { "display: block;" } else { "display: none;" };

    html! {
        <div id="violationsList" class="violations-list" style={style}>
            {for props.findings.iter().map(|finding| html! {
                <div class="violation-item">
                    <div class="violation-title">
                        <a href={finding.url.clone()} target="_blank" rel="noopener noreferrer">
                            {&finding.title}
                        </a>
                    </div>
                    <div class="violation-description">{&finding.description}</div>
                </div>
            })}
        </div>
    }
}
