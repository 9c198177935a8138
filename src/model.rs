use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Id of the root task. It exists from `init` onwards and is never removed.
pub const ROOT_ID: u64 = 0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "progr")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "progr"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl State {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }

    /// Position used by `sort`: work in progress first, finished work last.
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::Todo => 1,
            Self::Done => 2,
        }
    }
}

/// Derived state of a parent from its children's states.
///
/// Returns `None` for an empty child list: leaves have no derived state.
pub fn derive_state<I>(children: I) -> Option<State>
where
    I: IntoIterator<Item = State>,
{
    let mut any = false;
    let mut todo = false;
    let mut progr = false;
    let mut done = false;
    for state in children {
        any = true;
        match state {
            State::Todo => todo = true,
            State::InProgress => progr = true,
            State::Done => done = true,
        }
    }
    if !any {
        None
    } else if progr || (todo && done) {
        Some(State::InProgress)
    } else if done {
        Some(State::Done)
    } else {
        Some(State::Todo)
    }
}

/// One persisted task record. The id is the record's key in the store and is not
/// part of the serialized document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(skip)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: State,
    #[serde(rename = "tasks", default)]
    pub children: Vec<u64>,
    #[serde(rename = "descr", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "time_cost", default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(rename = "worked_time", default, skip_serializing_if = "Option::is_none")]
    pub worked_seconds: Option<u64>,
    #[serde(
        rename = "work_time_start",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_start: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: State::Todo,
            children: Vec::new(),
            description: None,
            estimated_cost: None,
            worked_seconds: None,
            session_start: None,
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_ID, "root")
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_child(&self, id: u64) -> bool {
        self.children.contains(&id)
    }

    /// Zero cost means "not estimated"; duplicate child ids keep their first position.
    pub fn normalize(&mut self) {
        if self.estimated_cost == Some(0.0) {
            self.estimated_cost = None;
        }
        if self.worked_seconds == Some(0) {
            self.worked_seconds = None;
        }
        if let Some(desc) = &self.description
            && desc.trim().is_empty()
        {
            self.description = None;
        }
        let mut seen = std::collections::HashSet::new();
        self.children.retain(|id| seen.insert(*id));
    }

    /// Direct state assignment, allowed on leaves only.
    pub fn set_state(&mut self, state: State) -> Result<()> {
        if !self.is_leaf() {
            return Err(TreeError::invalid(format!(
                "cannot change state of task {} because it has subtasks",
                self.id
            )));
        }
        self.state = state;
        Ok(())
    }

    pub fn set_estimated_cost(&mut self, cost: f64) -> Result<()> {
        if self.is_root() {
            return Err(TreeError::invalid("cannot estimate the root task"));
        }
        if !self.is_leaf() {
            return Err(TreeError::invalid(format!(
                "cannot estimate task {} because it has subtasks",
                self.id
            )));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(TreeError::invalid(format!(
                "cost must be a non-negative number, got {cost}"
            )));
        }
        self.estimated_cost = if cost == 0.0 { None } else { Some(cost) };
        Ok(())
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.session_start {
            Some(start) => u64::try_from((now - start).num_seconds()).unwrap_or(0),
            None => 0,
        }
    }

    /// Worked time recorded on this record, including an open session.
    pub fn own_worked_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.worked_seconds.unwrap_or(0) + self.elapsed_seconds(now)
    }

    pub fn has_open_session(&self) -> bool {
        self.session_start.is_some()
    }

    /// Start a timing session. An already open session is folded first; the
    /// folded seconds are returned.
    pub fn begin_session(&mut self, now: DateTime<Utc>) -> Result<Option<u64>> {
        if !self.is_leaf() {
            return Err(TreeError::invalid(format!(
                "cannot track time on task {} because it has subtasks",
                self.id
            )));
        }
        let folded = self.end_session(now);
        self.session_start = Some(now);
        Ok(folded)
    }

    /// Close the open session, if any, adding its elapsed time to the total.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Option<u64> {
        let elapsed = self.elapsed_seconds(now);
        self.session_start.take()?;
        let total = self.worked_seconds.unwrap_or(0) + elapsed;
        self.worked_seconds = (total > 0).then_some(total);
        Some(elapsed)
    }

    pub fn reset_worked_time(&mut self) {
        self.worked_seconds = None;
        self.session_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn derive_state_follows_children() {
        use State::*;
        assert_eq!(derive_state([]), None);
        assert_eq!(derive_state([Todo, Todo]), Some(Todo));
        assert_eq!(derive_state([Done, Done]), Some(Done));
        assert_eq!(derive_state([Done, Todo]), Some(InProgress));
        assert_eq!(derive_state([Todo, InProgress]), Some(InProgress));
        assert_eq!(derive_state([Done, InProgress]), Some(InProgress));
    }

    #[test]
    fn state_serializes_short_names() {
        assert_eq!(serde_json::to_string(&State::InProgress).unwrap(), r#""progr""#);
        assert_eq!(serde_json::to_string(&State::Todo).unwrap(), r#""todo""#);
        let parsed: State = serde_json::from_str(r#""done""#).unwrap();
        assert_eq!(parsed, State::Done);
    }

    #[test]
    fn minimal_task_omits_optional_fields() {
        let json = serde_json::to_string(&Task::new(7, "Leaf")).unwrap();
        assert_eq!(json, r#"{"name":"Leaf","state":"todo","tasks":[]}"#);
    }

    #[test]
    fn record_uses_persisted_field_names() {
        let start = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut task = Task::new(3, "Write docs");
        task.children = vec![4, 5];
        task.description = Some("all of them\n".into());
        task.estimated_cost = Some(2.5);
        task.worked_seconds = Some(60);
        task.session_start = Some(start);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["tasks"], serde_json::json!([4, 5]));
        assert_eq!(value["descr"], "all of them\n");
        assert_eq!(value["time_cost"], 2.5);
        assert_eq!(value["worked_time"], 60);
        assert_eq!(value["work_time_start"], "2024-05-01T10:00:00Z");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn set_state_rejects_parents() {
        let mut task = Task::new(1, "Parent");
        task.children.push(2);
        assert!(matches!(
            task.set_state(State::Done),
            Err(TreeError::InvalidOperation(_))
        ));
        task.children.clear();
        task.set_state(State::Done).unwrap();
        assert_eq!(task.state, State::Done);
    }

    #[test]
    fn zero_cost_clears_estimate() {
        let mut task = Task::new(1, "Leaf");
        task.set_estimated_cost(5.0).unwrap();
        assert_eq!(task.estimated_cost, Some(5.0));
        task.set_estimated_cost(0.0).unwrap();
        assert_eq!(task.estimated_cost, None);
        assert!(task.set_estimated_cost(-1.0).is_err());
        assert!(task.set_estimated_cost(f64::NAN).is_err());
    }

    #[test]
    fn root_cannot_be_estimated() {
        let mut root = Task::root();
        assert!(root.set_estimated_cost(1.0).is_err());
    }

    #[test]
    fn begin_session_folds_open_session() {
        let t0 = Utc::now();
        let mut task = Task::new(2, "Leaf");
        assert_eq!(task.begin_session(t0).unwrap(), None);
        let folded = task.begin_session(t0 + Duration::seconds(90)).unwrap();
        assert_eq!(folded, Some(90));
        assert_eq!(task.worked_seconds, Some(90));
        assert_eq!(task.own_worked_seconds(t0 + Duration::seconds(100)), 100);
    }

    #[test]
    fn end_session_without_session_is_noop() {
        let mut task = Task::new(2, "Leaf");
        assert_eq!(task.end_session(Utc::now()), None);
        assert_eq!(task.worked_seconds, None);
    }

    #[test]
    fn elapsed_never_negative() {
        let now = Utc::now();
        let mut task = Task::new(2, "Leaf");
        task.session_start = Some(now + Duration::seconds(30));
        assert_eq!(task.elapsed_seconds(now), 0);
    }

    #[test]
    fn normalize_dedups_children_in_order() {
        let mut task = Task::new(1, "Parent");
        task.children = vec![3, 2, 3, 1, 2];
        task.estimated_cost = Some(0.0);
        task.description = Some("  \n".into());
        task.normalize();
        assert_eq!(task.children, vec![3, 2, 1]);
        assert_eq!(task.estimated_cost, None);
        assert_eq!(task.description, None);
    }
}
