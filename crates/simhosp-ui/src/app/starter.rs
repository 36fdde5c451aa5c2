//! Pathway starter panel component.
//!
//! # Design
//! - Panel state is a [`StarterPanel`] driven through `use_reducer`.
//! - Each submit takes a generation from a shared [`SubmissionTracker`] and an
//!   `AbortController`; a newer submit or unmount aborts the older requests in flight and the
//!   old poll loop stops at its next liveness check.

use crate::core::config::StarterConfig;
use crate::core::poll::PollStep;
use crate::core::requests::PostRequest;
use crate::core::starter::{
    PanelAction, PanelPhase, PollRun, RunStep, StarterPanel, SubmissionTracker,
};
use crate::services::http::EndpointClient;
use gloo::console;
use gloo_timers::future::TimeoutFuture;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, AbortSignal, HtmlTextAreaElement};
use yew::prelude::*;

const INPUT_PLACEHOLDER: &str = "Enter pathway name or YML definition";
const SUBMIT_LABEL: &str = "Run or Send";

impl Reducible for StarterPanel {
    type Action = PanelAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.apply(action) {
            Rc::new(next)
        } else {
            self
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PathwayStarterProps {
    pub(crate) config: StarterConfig,
}

#[function_component(PathwayStarter)]
pub(crate) fn pathway_starter(props: &PathwayStarterProps) -> Html {
    let panel = use_reducer(StarterPanel::new);
    let tracker = use_mut_ref(SubmissionTracker::new);
    let inflight = use_mut_ref(|| None as Option<SubmissionHandle>);
    let input_ref = use_node_ref();
    let client = use_memo(|path| EndpointClient::new(path.clone()), props.config.path.clone());

    {
        let tracker = tracker.clone();
        let inflight = inflight.clone();
        let dispatcher = panel.dispatcher();
        use_effect_with_deps(
            move |_| {
                move || {
                    tracker.borrow_mut().close();
                    if let Some(handle) = inflight.borrow_mut().take() {
                        handle.abort();
                    }
                    dispatcher.dispatch(PanelAction::Cancel);
                }
            },
            (),
        );
    }

    let onclick = {
        let dispatcher = panel.dispatcher();
        let input_ref = input_ref.clone();
        let policy = props.config.poll;
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            let Some(generation) = tracker.borrow_mut().start() else {
                return;
            };
            if let Some(previous) = inflight.borrow_mut().take() {
                previous.abort();
            }
            let handle = SubmissionHandle::new();
            let signal = handle.as_ref().map(SubmissionHandle::signal);
            *inflight.borrow_mut() = handle;

            let text = input_ref
                .cast::<HtmlTextAreaElement>()
                .map(|area| area.value())
                .unwrap_or_default();
            dispatcher.dispatch(PanelAction::Submit { generation });
            let submission = Submission {
                client: client.clone(),
                run: PollRun::new(generation, policy),
                tracker: tracker.clone(),
                signal,
                dispatcher: dispatcher.clone(),
            };
            spawn_local(submission.run(text));
        })
    };

    let busy = matches!(
        panel.phase(),
        PanelPhase::Submitted | PanelPhase::Polling { .. }
    );
    let headline_class = classes!(
        "response-text",
        panel
            .response()
            .filter(|response| response.is_error())
            .map(|_| "response-error"),
    );
    let items = panel
        .response()
        .map(|response| response.items().to_vec())
        .unwrap_or_default();

    html! {
        <>
            <textarea
                ref={input_ref}
                class="request-text"
                placeholder={INPUT_PLACEHOLDER}
            />
            <input
                type="submit"
                class="request-button"
                value={SUBMIT_LABEL}
                aria-busy={busy.to_string()}
                {onclick}
            />
            <div class="response">
                <p class={headline_class}>{ panel.headline().to_string() }</p>
                <div class="textfield-response-name">
                    <ul>
                        { for items.into_iter().map(|item| html! { <li>{ item }</li> }) }
                    </ul>
                </div>
                {
                    panel.notice().map_or_else(Html::default, |notice| html! {
                        <p class="response-notice">{ notice.to_string() }</p>
                    })
                }
            </div>
        </>
    }
}

/// Abort handle for the requests of one submission.
struct SubmissionHandle {
    controller: AbortController,
}

impl SubmissionHandle {
    fn new() -> Option<Self> {
        match AbortController::new() {
            Ok(controller) => Some(Self { controller }),
            Err(err) => {
                console::warn!("abort controller unavailable", err);
                None
            }
        }
    }

    fn signal(&self) -> AbortSignal {
        self.controller.signal()
    }

    fn abort(&self) {
        self.controller.abort();
    }
}

/// One submit click: POST the text, then poll until ready, exhausted or superseded.
struct Submission {
    client: Rc<EndpointClient>,
    run: PollRun,
    tracker: Rc<RefCell<SubmissionTracker>>,
    signal: Option<AbortSignal>,
    dispatcher: UseReducerDispatcher<StarterPanel>,
}

impl Submission {
    fn is_live(&self) -> bool {
        self.run.may_fetch(&self.tracker.borrow())
    }

    async fn run(mut self, text: String) {
        let signal = self.signal.as_ref();
        let request = PostRequest::starter(self.client.path(), text);
        if let Err(err) = self.client.post(&request, signal).await {
            if !self.is_live() {
                return;
            }
            console::warn!("pathway submission failed", self.client.path(), err.to_string());
        }

        loop {
            if !self.is_live() {
                return;
            }
            let outcome = self.client.poll(signal).await;
            let step = {
                let tracker = self.tracker.borrow();
                self.run.observe(&tracker, outcome)
            };
            match step {
                RunStep::Continue { action, delay_ms } => {
                    self.dispatcher.dispatch(action);
                    TimeoutFuture::new(delay_ms).await;
                }
                RunStep::Finish(action) => {
                    if let PanelAction::Step {
                        step: PollStep::Exhausted { attempts, .. },
                        ..
                    } = &action
                    {
                        console::warn!("pathway response polling gave up", *attempts);
                    }
                    self.dispatcher.dispatch(action);
                    return;
                }
                RunStep::Superseded => {
                    console::debug!(
                        "dropping response for superseded submission",
                        self.run.generation().to_string()
                    );
                    return;
                }
            }
        }
    }
}
