//! In-process repositories

use async_trait::async_trait;
use chrono::Utc;
use octophyx_domain::{
    ContentId, ContentRepository, ContentRequest, NewContentRequest, NewProblem, OwnerId,
    ProblemId, ProblemRepository, ProblemSolution, RepositoryError,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Keeps every record in a map guarded by an async `RwLock`.
///
/// Ids start at 1 and increase monotonically. Records live as long as the
/// process.
#[derive(Default)]
pub struct InMemoryContentRepository {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    records: BTreeMap<ContentId, ContentRequest>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, request: NewContentRequest) -> Result<ContentRequest, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = ContentId::new(state.last_id);
        let record = ContentRequest::new(id, request, Utc::now());
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ContentId) -> Result<Option<ContentRequest>, RepositoryError> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn update(&self, request: &ContentRequest) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&request.id) {
            Some(slot) => {
                *slot = request.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(request.id)),
        }
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ContentRequest>, RepositoryError> {
        let state = self.state.read().await;
        // Ids are assigned in creation order, so reverse id order is newest first
        Ok(state
            .records
            .values()
            .rev()
            .filter(|r| r.owner == Some(owner))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Problem counterpart of [`InMemoryContentRepository`], with its own ids.
#[derive(Default)]
pub struct InMemoryProblemRepository {
    state: RwLock<ProblemState>,
}

#[derive(Default)]
struct ProblemState {
    last_id: i64,
    problems: BTreeMap<ProblemId, ProblemSolution>,
}

impl InMemoryProblemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn insert(&self, problem: NewProblem) -> Result<ProblemSolution, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = ProblemId::new(state.last_id);
        let record = ProblemSolution::new(id, problem, Utc::now());
        state.problems.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ProblemId) -> Result<Option<ProblemSolution>, RepositoryError> {
        Ok(self.state.read().await.problems.get(&id).cloned())
    }

    async fn update(&self, problem: &ProblemSolution) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.problems.get_mut(&problem.id) {
            Some(slot) => {
                *slot = problem.clone();
                Ok(())
            }
            None => Err(RepositoryError::ProblemNotFound(problem.id)),
        }
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ProblemSolution>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .problems
            .values()
            .rev()
            .filter(|p| p.owner == Some(owner))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octophyx_domain::{ContentStatus, GeneratedContent, Topic};

    fn new_request(topic: &str, owner: Option<i64>) -> NewContentRequest {
        NewContentRequest::new(Topic::try_new(topic).unwrap(), owner.map(OwnerId::new))
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryContentRepository::new();
        let a = repo.insert(new_request("Diffraction", None)).await.unwrap();
        let b = repo.insert(new_request("Lens Equation", None)).await.unwrap();
        assert_eq!(a.id, ContentId::new(1));
        assert_eq!(b.id, ContentId::new(2));
        assert_eq!(a.status, ContentStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let repo = InMemoryContentRepository::new();
        let mut record = repo.insert(new_request("Carnot Cycle", Some(1))).await.unwrap();
        record.start_generation(Utc::now()).unwrap();
        record
            .complete(
                GeneratedContent {
                    explanation: "η = 1 - T_c/T_h".to_string(),
                    animation_code: "class Carnot(Scene): pass".to_string(),
                    diagram_url: None,
                },
                Utc::now(),
            )
            .unwrap();
        repo.update(&record).await.unwrap();

        assert_eq!(repo.get(record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_get_and_update_unknown_id() {
        let repo = InMemoryContentRepository::new();
        assert!(repo.get(ContentId::new(42)).await.unwrap().is_none());

        let phantom = ContentRequest::new(
            ContentId::new(42),
            new_request("Heat Transfer", None),
            Utc::now(),
        );
        assert!(matches!(
            repo.update(&phantom).await,
            Err(RepositoryError::NotFound(id)) if id == ContentId::new(42)
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let repo = InMemoryContentRepository::new();
        for topic in ["Doppler Effect", "Standing Waves", "Wave Interference"] {
            repo.insert(new_request(topic, Some(7))).await.unwrap();
        }
        repo.insert(new_request("Coulomb's Law", Some(8))).await.unwrap();
        repo.insert(new_request("Electric Fields", None)).await.unwrap();

        let topics: Vec<String> = repo
            .list_by_owner(OwnerId::new(7), 2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.topic.to_string())
            .collect();
        assert_eq!(topics, vec!["Wave Interference", "Standing Waves"]);
    }

    mod problems {
        use super::super::*;
        use octophyx_domain::{ContentStatus, ProblemText, SolvedProblem};

        fn new_problem(text: &str, owner: Option<i64>) -> NewProblem {
            NewProblem::new(ProblemText::try_new(text).unwrap(), owner.map(OwnerId::new))
        }

        #[tokio::test]
        async fn test_update_round_trip() {
            let repo = InMemoryProblemRepository::new();
            let mut problem = repo
                .insert(new_problem("A proton moves at 0.8c. Find its momentum.", Some(1)))
                .await
                .unwrap();
            assert_eq!(problem.id, ProblemId::new(1));

            problem.start_generation(Utc::now()).unwrap();
            problem
                .complete(
                    SolvedProblem {
                        solution: "γ = 5/3\n\np = γmv".to_string(),
                        diagram_url: None,
                    },
                    Utc::now(),
                )
                .unwrap();
            problem.toggle_bookmark(Utc::now());
            repo.update(&problem).await.unwrap();

            let stored = repo.get(problem.id).await.unwrap().unwrap();
            assert_eq!(stored.status, ContentStatus::Completed);
            assert_eq!(stored.steps.len(), 2);
            assert!(stored.bookmarked);
        }

        #[tokio::test]
        async fn test_unknown_problem() {
            let repo = InMemoryProblemRepository::new();
            assert!(repo.get(ProblemId::new(3)).await.unwrap().is_none());

            let phantom = ProblemSolution::new(
                ProblemId::new(3),
                new_problem("A proton moves at 0.8c.", None),
                Utc::now(),
            );
            assert!(matches!(
                repo.update(&phantom).await,
                Err(RepositoryError::ProblemNotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_list_by_owner_newest_first() {
            let repo = InMemoryProblemRepository::new();
            for text in ["Problem number one.", "Problem number two.", "Problem number three."] {
                repo.insert(new_problem(text, Some(4))).await.unwrap();
            }
            repo.insert(new_problem("Someone else's problem.", Some(5))).await.unwrap();

            let texts: Vec<String> = repo
                .list_by_owner(OwnerId::new(4), 2)
                .await
                .unwrap()
                .into_iter()
                .map(|p| p.problem_text.to_string())
                .collect();
            assert_eq!(texts, vec!["Problem number three.", "Problem number two."]);
        }
    }
}
