//! Test doubles shared by the use case tests.

use crate::ports::participant_gateway::{GatewayError, Generation, ParticipantGateway};
use crate::ports::session_store::{SessionStore, StoreError};
use async_trait::async_trait;
use debate_domain::{Participant, Session};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const AGREEING: &str =
    "Renewable energy adoption keeps growing because storage prices keep falling.";

pub(crate) fn divergent_text(participant: Participant) -> &'static str {
    match participant {
        Participant::Claude => "Nuclear reactors provide steady baseload electricity.",
        Participant::Gpt => "Offshore turbines harvest coastal breezes.",
        Participant::Gemini => "Rooftop panels cover suburban households.",
    }
}

pub(crate) fn generation(content: &str, cost: f64) -> Generation {
    Generation {
        content: content.to_string(),
        confidence: 75,
        model: "mock-model".to_string(),
        tokens_used: 100,
        cost,
    }
}

/// Gateway with per-participant queued replies and a fallback reply
pub(crate) struct ScriptedGateway {
    queued: Mutex<HashMap<Participant, VecDeque<Result<Generation, GatewayError>>>>,
    failing: HashSet<Participant>,
    agreeing: bool,
    cost: f64,
    prompts: Mutex<Vec<(Participant, String)>>,
}

impl ScriptedGateway {
    /// Every participant gives a different answer
    pub(crate) fn divergent(cost: f64) -> Self {
        Self {
            queued: Mutex::new(HashMap::new()),
            failing: HashSet::new(),
            agreeing: false,
            cost,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every participant gives the same answer
    pub(crate) fn agreeing(cost: f64) -> Self {
        Self {
            agreeing: true,
            ..Self::divergent(cost)
        }
    }

    pub(crate) fn failing(mut self, participant: Participant) -> Self {
        self.failing.insert(participant);
        self
    }

    pub(crate) fn queue(
        self,
        participant: Participant,
        reply: Result<Generation, GatewayError>,
    ) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(participant)
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn prompts_for(&self, participant: Participant) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == participant)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ParticipantGateway for ScriptedGateway {
    async fn generate(
        &self,
        participant: Participant,
        prompt: &str,
        _model_override: Option<&str>,
    ) -> Result<Generation, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push((participant, prompt.to_string()));

        if let Some(reply) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&participant)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        if self.failing.contains(&participant) {
            return Err(GatewayError::RequestFailed("provider unavailable".into()));
        }
        let content = if self.agreeing {
            AGREEING
        } else {
            divergent_text(participant)
        };
        Ok(generation(content, self.cost))
    }
}

/// In-memory store counting writes
#[derive(Default)]
pub(crate) struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub(crate) fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub(crate) fn stored(&self, id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn insert(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id().to_string(), session);
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.stored(id))
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        *self.writes.lock().unwrap() += 1;
        self.insert(session.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.lock().unwrap().remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.sessions.lock().unwrap().keys().cloned().collect())
    }

    async fn cleanup(&self, _max_age: Duration) -> Result<usize, StoreError> {
        Ok(0)
    }
}
