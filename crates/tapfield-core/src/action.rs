//! Node actions - timed fades, scaling, rotation, and their evaluator
//!
//! Actions are plain data so they can be loaded from an action library file
//! (e.g. the `Pulse` action) and cloned along with the node that runs them.
//! A node that is not part of a scene never advances its actions, so a clone
//! of a template starts every inherited action from the beginning.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::node::SceneNode;
use crate::resource::SceneError;

/// Upper bound on body restarts of a `RepeatForever` within one step
const MAX_REPEATS_PER_STEP: usize = 1024;

/// An action tree. Durations are in seconds, angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Fade alpha from its current value to 1.0
    FadeIn { duration: f32 },
    /// Fade alpha from its current value to 0.0
    FadeOut { duration: f32 },
    FadeAlphaTo { alpha: f32, duration: f32 },
    ScaleTo { scale: f32, duration: f32 },
    /// Rotate counter-clockwise by `angle` (relative)
    RotateBy { angle: f32, duration: f32 },
    Wait { duration: f32 },
    Sequence { actions: Vec<Action> },
    RepeatForever { action: Box<Action> },
    RemoveFromParent,
}

impl Action {
    pub fn fade_in(duration: f32) -> Self {
        Action::FadeIn { duration }
    }

    pub fn fade_out(duration: f32) -> Self {
        Action::FadeOut { duration }
    }

    pub fn rotate_by(angle: f32, duration: f32) -> Self {
        Action::RotateBy { angle, duration }
    }

    pub fn wait(duration: f32) -> Self {
        Action::Wait { duration }
    }

    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        Action::Sequence {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn repeat_forever(action: Action) -> Self {
        Action::RepeatForever {
            action: Box::new(action),
        }
    }

    /// Total run time, or `None` if the action never finishes
    pub fn duration(&self) -> Option<f32> {
        match self {
            Action::FadeIn { duration }
            | Action::FadeOut { duration }
            | Action::FadeAlphaTo { duration, .. }
            | Action::ScaleTo { duration, .. }
            | Action::RotateBy { duration, .. }
            | Action::Wait { duration } => Some(duration.max(0.0)),
            Action::Sequence { actions } => actions
                .iter()
                .try_fold(0.0, |total, action| action.duration().map(|d| total + d)),
            Action::RepeatForever { .. } => None,
            Action::RemoveFromParent => Some(0.0),
        }
    }
}

/// Named actions available to a scene (e.g. "Pulse")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionLibrary {
    #[serde(default)]
    pub actions: HashMap<String, Action>,
}

impl ActionLibrary {
    /// Parse an action library from TOML (`[actions.<name>]` tables)
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse an action library from JSON (`{"actions": {...}}`)
    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, action: Action) {
        self.actions.insert(name.into(), action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// An action attached to a node, optionally under a key
#[derive(Debug, Clone)]
pub struct RunningAction {
    key: Option<String>,
    state: ActionState,
}

impl RunningAction {
    pub(crate) fn new(action: &Action, key: Option<&str>) -> Self {
        Self {
            key: key.map(str::to_owned),
            state: ActionState::new(action),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Advance by `dt` seconds. Returns false once the action has finished.
    pub(crate) fn step(&mut self, node: &mut SceneNode, dt: f32) -> bool {
        matches!(self.state.step(node, dt), Progress::Running)
    }
}

enum Progress {
    Running,
    /// Finished, with the part of the time step it did not consume
    Finished(f32),
}

#[derive(Debug, Clone, Copy)]
enum Tween {
    AlphaTo(f32),
    ScaleTo(f32),
    RotateBy(f32),
    Wait,
}

impl Tween {
    fn start_value(self, node: &SceneNode) -> f32 {
        match self {
            Tween::AlphaTo(_) => node.alpha,
            Tween::ScaleTo(_) => node.scale,
            Tween::RotateBy(_) | Tween::Wait => 0.0,
        }
    }

    fn apply(self, node: &mut SceneNode, from: f32, t_before: f32, t: f32) {
        match self {
            Tween::AlphaTo(target) => node.alpha = from + (target - from) * t,
            Tween::ScaleTo(target) => node.scale = from + (target - from) * t,
            Tween::RotateBy(angle) => node.rotation += angle * (t - t_before),
            Tween::Wait => {}
        }
    }
}

#[derive(Debug, Clone)]
enum ActionState {
    Tween {
        tween: Tween,
        duration: f32,
        elapsed: f32,
        start: Option<f32>,
    },
    Sequence {
        pending: VecDeque<Action>,
        current: Option<Box<ActionState>>,
    },
    Repeat {
        body: Action,
        current: Box<ActionState>,
        // Zero-length bodies run once per step instead of looping in place
        instant: bool,
    },
    Remove,
}

impl ActionState {
    fn new(action: &Action) -> Self {
        let tween = |tween, duration: f32| ActionState::Tween {
            tween,
            duration: duration.max(0.0),
            elapsed: 0.0,
            start: None,
        };

        match action {
            Action::FadeIn { duration } => tween(Tween::AlphaTo(1.0), *duration),
            Action::FadeOut { duration } => tween(Tween::AlphaTo(0.0), *duration),
            Action::FadeAlphaTo { alpha, duration } => tween(Tween::AlphaTo(*alpha), *duration),
            Action::ScaleTo { scale, duration } => tween(Tween::ScaleTo(*scale), *duration),
            Action::RotateBy { angle, duration } => tween(Tween::RotateBy(*angle), *duration),
            Action::Wait { duration } => tween(Tween::Wait, *duration),
            Action::Sequence { actions } => ActionState::Sequence {
                pending: actions.iter().cloned().collect(),
                current: None,
            },
            Action::RepeatForever { action } => ActionState::Repeat {
                body: (**action).clone(),
                current: Box::new(ActionState::new(action)),
                instant: action.duration() == Some(0.0),
            },
            Action::RemoveFromParent => ActionState::Remove,
        }
    }

    fn step(&mut self, node: &mut SceneNode, dt: f32) -> Progress {
        match self {
            ActionState::Tween {
                tween,
                duration,
                elapsed,
                start,
            } => {
                let from = *start.get_or_insert_with(|| tween.start_value(node));
                let before = *elapsed;
                *elapsed = (before + dt).min(*duration);
                tween.apply(
                    node,
                    from,
                    fraction(before, *duration),
                    fraction(*elapsed, *duration),
                );

                if *elapsed >= *duration {
                    Progress::Finished(dt - (*elapsed - before))
                } else {
                    Progress::Running
                }
            }
            ActionState::Sequence { pending, current } => {
                let mut remaining = dt;
                loop {
                    if current.is_none() {
                        match pending.pop_front() {
                            Some(next) => *current = Some(Box::new(ActionState::new(&next))),
                            None => return Progress::Finished(remaining),
                        }
                    }
                    let Some(state) = current.as_mut() else {
                        return Progress::Finished(remaining);
                    };
                    match state.step(node, remaining) {
                        Progress::Running => return Progress::Running,
                        Progress::Finished(left) => {
                            *current = None;
                            remaining = left;
                        }
                    }
                }
            }
            ActionState::Repeat {
                body,
                current,
                instant,
            } => {
                if *instant {
                    current.step(node, dt);
                    **current = ActionState::new(body);
                    return Progress::Running;
                }

                let mut remaining = dt;
                for _ in 0..MAX_REPEATS_PER_STEP {
                    match current.step(node, remaining) {
                        Progress::Running => return Progress::Running,
                        Progress::Finished(left) => {
                            **current = ActionState::new(body);
                            // A body too short to register against `remaining` consumes no time
                            if left <= 0.0 || left >= remaining {
                                return Progress::Running;
                            }
                            remaining = left;
                        }
                    }
                }
                trace!(dt, "Repeat body restarted too often, dropping leftover time");
                Progress::Running
            }
            ActionState::Remove => {
                node.request_removal();
                Progress::Finished(dt)
            }
        }
    }
}

fn fraction(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::node::SceneNode;
    use std::f32::consts::PI;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn shape() -> SceneNode {
        SceneNode::rounded_rect(Size::square(10.0), 3.0)
    }

    #[test]
    fn test_fade_in_from_current_alpha() {
        let mut node = shape();
        node.alpha = 0.0;
        node.run_action(Action::fade_in(2.0), None);

        node.advance(0.5);
        assert!(approx(node.alpha, 0.25));
        node.advance(1.5);
        assert!(approx(node.alpha, 1.0));
        assert_eq!(node.action_count(), 0);
    }

    #[test]
    fn test_rotate_forever_keeps_turning() {
        let mut node = shape();
        node.run_action(Action::repeat_forever(Action::rotate_by(PI, 1.0)), None);

        for _ in 0..30 {
            node.advance(0.1);
        }
        assert!(approx(node.rotation, 3.0 * PI));
        assert_eq!(node.action_count(), 1);
    }

    #[test]
    fn test_sequence_carries_leftover_time() {
        let mut node = shape();
        node.run_action(
            Action::sequence([Action::wait(0.5), Action::fade_out(0.5)]),
            None,
        );

        // One step crosses the wait/fade boundary
        node.advance(0.75);
        assert!(approx(node.alpha, 0.5));
        node.advance(0.25);
        assert!(approx(node.alpha, 0.0));
        assert_eq!(node.action_count(), 0);
    }

    #[test]
    fn test_remove_from_parent_requests_removal() {
        let mut node = shape();
        node.run_action(
            Action::sequence([
                Action::wait(0.5),
                Action::fade_out(0.5),
                Action::RemoveFromParent,
            ]),
            None,
        );

        node.advance(0.9);
        assert!(!node.is_removal_requested());
        node.advance(0.2);
        assert!(node.is_removal_requested());
    }

    #[test]
    fn test_keyed_action_replaces_previous() {
        let mut node = shape();
        node.run_action(Action::wait(5.0), Some("fadeInOut"));
        node.run_action(Action::wait(1.0), Some("fadeInOut"));
        node.run_action(Action::wait(1.0), None);

        assert_eq!(node.action_count(), 2);
        node.advance(1.0);
        assert!(!node.has_action("fadeInOut"));
    }

    #[test]
    fn test_instant_repeat_does_not_spin() {
        let mut node = shape();
        node.run_action(
            Action::repeat_forever(Action::FadeAlphaTo {
                alpha: 0.5,
                duration: 0.0,
            }),
            None,
        );

        node.advance(1.0);
        assert!(approx(node.alpha, 0.5));
        assert_eq!(node.action_count(), 1);
    }

    #[test]
    fn test_tiny_repeat_body_returns_within_step() {
        // Body shorter than f32 resolution at dt: leftover rounds back to dt
        let mut node = shape();
        node.run_action(Action::repeat_forever(Action::rotate_by(1.0, 1e-10)), None);
        node.advance(0.016);
        assert!(approx(node.rotation, 1.0));
        assert_eq!(node.action_count(), 1);

        // Body that consumes a sliver of time per restart is capped per step
        let mut node = shape();
        node.run_action(Action::repeat_forever(Action::rotate_by(1.0, 1e-9)), None);
        node.advance(0.016);
        assert!(node.rotation <= MAX_REPEATS_PER_STEP as f32 + 1e-3);
        assert!(node.rotation >= 1.0);
        assert_eq!(node.action_count(), 1);

        // Ordinary bodies still complete several cycles in one long step
        let mut node = shape();
        node.run_action(Action::repeat_forever(Action::rotate_by(1.0, 0.25)), None);
        node.advance(1.0);
        assert!(approx(node.rotation, 4.0));
    }

    #[test]
    fn test_durations() {
        let marker = Action::sequence([
            Action::wait(0.5),
            Action::fade_out(0.5),
            Action::RemoveFromParent,
        ]);
        assert_eq!(marker.duration(), Some(1.0));
        assert_eq!(
            Action::repeat_forever(Action::rotate_by(PI, 1.0)).duration(),
            None
        );
        assert_eq!(Action::wait(-1.0).duration(), Some(0.0));
    }

    #[test]
    fn test_library_from_toml() {
        let toml = r#"
[actions.Pulse]
type = "sequence"
actions = [
    { type = "scale_to", scale = 1.25, duration = 0.1 },
    { type = "scale_to", scale = 1.0, duration = 0.1 },
]

[actions.Spin]
type = "repeat_forever"
action = { type = "rotate_by", angle = 3.14159, duration = 1.0 }
"#;

        let library = ActionLibrary::from_toml(toml).unwrap();
        assert_eq!(library.len(), 2);
        assert!(approx(library.get("Pulse").unwrap().duration().unwrap(), 0.2));
        assert!(library.get("Spin").unwrap().duration().is_none());
        assert!(library.get("Missing").is_none());
    }

    #[test]
    fn test_library_from_json() {
        let json = r#"{"actions": {"Blink": {"type": "fade_out", "duration": 0.3}}}"#;
        let library = ActionLibrary::from_json(json).unwrap();
        assert_eq!(library.get("Blink"), Some(&Action::fade_out(0.3)));
    }
}
