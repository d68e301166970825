//! Render coordination
//!
//! Spec, locale and theme changes all funnel into one lifecycle:
//! `idle → loading → rendering → ready`. [`transition`] is pure; the caller
//! performs the returned effects.
//!
//! Every trigger starts a new generation. Fetch results and renderer
//! completions carry the generation they were started for and are dropped
//! once a newer trigger exists, so a slow response for a spec the user has
//! already left never mounts over the newer one.

use super::theme::Theme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPhase {
    #[default]
    Idle,
    Loading,
    Rendering,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    InitialLoad,
    SpecChanged,
    LocaleChanged,
    ThemeChanged,
}

/// What to render: spec id, locale for the fetch, theme for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub api: String,
    pub locale: String,
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub phase: RenderPhase,
    /// Bumped by every trigger; 0 before the first one
    pub generation: u64,
    pub busy: bool,
    pub target: Option<RenderTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Trigger {
        trigger: RenderTrigger,
        target: RenderTarget,
    },
    Fetched {
        generation: u64,
    },
    Rendered {
        generation: u64,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEffect {
    ShowBusy,
    HideBusy,
    /// Drop the mounted viewer, if any
    DetachViewer,
    FetchSpec {
        generation: u64,
        target: RenderTarget,
    },
    InvokeRenderer {
        generation: u64,
        theme: Theme,
    },
    InjectConsole {
        generation: u64,
    },
    LogFailure {
        message: String,
    },
    /// A result for a superseded generation arrived and was ignored
    Superseded {
        generation: u64,
    },
}

pub fn transition(state: &RenderState, event: RenderEvent) -> (RenderState, Vec<RenderEffect>) {
    match event {
        RenderEvent::Trigger { target, .. } => {
            let generation = state.generation + 1;
            let next = RenderState {
                phase: RenderPhase::Loading,
                generation,
                busy: true,
                target: Some(target.clone()),
            };
            let effects = vec![
                RenderEffect::ShowBusy,
                RenderEffect::DetachViewer,
                RenderEffect::FetchSpec { generation, target },
            ];
            (next, effects)
        }

        RenderEvent::Fetched { generation }
            if is_current(state, generation, RenderPhase::Loading) =>
        {
            let theme = state.target.as_ref().map(|t| t.theme).unwrap_or_default();
            let next = RenderState {
                phase: RenderPhase::Rendering,
                ..state.clone()
            };
            (next, vec![RenderEffect::InvokeRenderer { generation, theme }])
        }

        RenderEvent::Rendered { generation }
            if is_current(state, generation, RenderPhase::Rendering) =>
        {
            let next = RenderState {
                phase: RenderPhase::Ready,
                busy: false,
                ..state.clone()
            };
            let effects = vec![
                RenderEffect::InjectConsole { generation },
                RenderEffect::HideBusy,
            ];
            (next, effects)
        }

        RenderEvent::Failed {
            generation,
            message,
        } if generation == state.generation => {
            // The old viewer is already gone; nothing to roll back to.
            let next = RenderState {
                phase: RenderPhase::Idle,
                busy: false,
                ..state.clone()
            };
            let effects = vec![
                RenderEffect::LogFailure { message },
                RenderEffect::HideBusy,
            ];
            (next, effects)
        }

        RenderEvent::Fetched { generation }
        | RenderEvent::Rendered { generation }
        | RenderEvent::Failed { generation, .. } => {
            (state.clone(), vec![RenderEffect::Superseded { generation }])
        }
    }
}

fn is_current(state: &RenderState, generation: u64, phase: RenderPhase) -> bool {
    state.generation == generation && state.phase == phase
}
