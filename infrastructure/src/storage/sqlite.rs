//! SQLite repositories (sqlx)
//!
//! Content requests and problems share one database and one pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octophyx_domain::{
    ContentId, ContentRepository, ContentRequest, ContentStatus, NewContentRequest, NewProblem,
    OwnerId, ProblemId, ProblemRepository, ProblemSolution, ProblemText, RepositoryError, Topic,
    TopicCategory,
};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS generated_content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic TEXT NOT NULL,
    owner_id INTEGER,
    status TEXT NOT NULL DEFAULT 'pending',
    explanation TEXT,
    animation_code TEXT,
    diagram_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const CREATE_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_generated_content_owner ON generated_content (owner_id, id)";

const CREATE_PROBLEMS_TABLE: &str = "CREATE TABLE IF NOT EXISTS physics_problems (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    problem_text TEXT NOT NULL,
    category TEXT,
    owner_id INTEGER,
    status TEXT NOT NULL DEFAULT 'pending',
    solution TEXT,
    steps TEXT NOT NULL DEFAULT '[]',
    diagram_url TEXT,
    bookmarked INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const CREATE_PROBLEMS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_physics_problems_owner ON physics_problems (owner_id, id)";

const SELECT_COLUMNS: &str = "SELECT id, topic, owner_id, status, explanation, animation_code, \
     diagram_url, created_at, updated_at FROM generated_content";

#[derive(Debug, FromRow)]
struct ContentRow {
    id: i64,
    topic: String,
    owner_id: Option<i64>,
    status: String,
    explanation: Option<String>,
    animation_code: Option<String>,
    diagram_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentRequest {
    type Error = RepositoryError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| RepositoryError::CorruptRecord { id: row.id, reason };
        let status = ContentStatus::from_str(&row.status).map_err(|e| corrupt(e.to_string()))?;
        let topic = Topic::try_new(row.topic.clone()).map_err(|e| corrupt(e.to_string()))?;

        Ok(ContentRequest {
            id: ContentId::new(row.id),
            topic,
            owner: row.owner_id.map(OwnerId::new),
            status,
            explanation: row.explanation,
            animation_code: row.animation_code,
            diagram_url: row.diagram_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_PROBLEM_COLUMNS: &str = "SELECT id, problem_text, category, owner_id, status, \
     solution, steps, diagram_url, bookmarked, created_at, updated_at FROM physics_problems";

#[derive(Debug, FromRow)]
struct ProblemRow {
    id: i64,
    problem_text: String,
    category: Option<String>,
    owner_id: Option<i64>,
    status: String,
    solution: Option<String>,
    steps: String,
    diagram_url: Option<String>,
    bookmarked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProblemRow> for ProblemSolution {
    type Error = RepositoryError;

    fn try_from(row: ProblemRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| RepositoryError::CorruptRecord { id: row.id, reason };
        let status = ContentStatus::from_str(&row.status).map_err(|e| corrupt(e.to_string()))?;
        let problem_text =
            ProblemText::try_new(row.problem_text.clone()).map_err(|e| corrupt(e.to_string()))?;
        let category = row
            .category
            .as_deref()
            .map(TopicCategory::from_str)
            .transpose()
            .map_err(|e| corrupt(e.to_string()))?;
        let steps: Vec<String> =
            serde_json::from_str(&row.steps).map_err(|e| corrupt(format!("steps: {}", e)))?;

        Ok(ProblemSolution {
            id: ProblemId::new(row.id),
            problem_text,
            category,
            owner: row.owner_id.map(OwnerId::new),
            status,
            solution: row.solution,
            steps,
            diagram_url: row.diagram_url,
            bookmarked: row.bookmarked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn query_error(error: sqlx::Error) -> RepositoryError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Unavailable(error.to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Content repository backed by a SQLite database.
pub struct SqliteContentRepository {
    pool: SqlitePool,
}

impl SqliteContentRepository {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    ///
    /// `sqlite::memory:` gives a private in-memory database held by a single
    /// connection.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RepositoryError::Unavailable(format!("invalid database url: {}", e)))?
            .create_if_missing(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        let repository = Self { pool };
        repository.migrate().await?;
        info!(url = %url, "SQLite content repository ready");
        Ok(repository)
    }

    async fn migrate(&self) -> Result<(), RepositoryError> {
        for statement in [
            CREATE_TABLE,
            CREATE_OWNER_INDEX,
            CREATE_PROBLEMS_TABLE,
            CREATE_PROBLEMS_OWNER_INDEX,
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(query_error)?;
        }
        Ok(())
    }

    /// Problem repository on the same database
    pub fn problems(&self) -> SqliteProblemRepository {
        SqliteProblemRepository {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl ContentRepository for SqliteContentRepository {
    async fn insert(&self, request: NewContentRequest) -> Result<ContentRequest, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO generated_content (topic, owner_id, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.topic.as_str())
        .bind(request.owner.map(|o| o.value()))
        .bind(ContentStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(ContentRequest::new(
            ContentId::new(result.last_insert_rowid()),
            request,
            now,
        ))
    }

    async fn get(&self, id: ContentId) -> Result<Option<ContentRequest>, RepositoryError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.map(ContentRequest::try_from).transpose()
    }

    async fn update(&self, request: &ContentRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE generated_content SET status = ?, explanation = ?, animation_code = ?, \
             diagram_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(request.status.as_str())
        .bind(request.explanation.as_deref())
        .bind(request.animation_code.as_deref())
        .bind(request.diagram_url.as_deref())
        .bind(request.updated_at)
        .bind(request.id.value())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(request.id));
        }
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ContentRequest>, RepositoryError> {
        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "{} WHERE owner_id = ? ORDER BY id DESC LIMIT ?",
            SELECT_COLUMNS
        ))
        .bind(owner.value())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        rows.into_iter().map(ContentRequest::try_from).collect()
    }
}

/// Problem repository; obtained from [`SqliteContentRepository::problems`].
pub struct SqliteProblemRepository {
    pool: SqlitePool,
}

fn steps_json(problem: &ProblemSolution) -> Result<String, RepositoryError> {
    serde_json::to_string(&problem.steps).map_err(|e| RepositoryError::Query(e.to_string()))
}

#[async_trait]
impl ProblemRepository for SqliteProblemRepository {
    async fn insert(&self, problem: NewProblem) -> Result<ProblemSolution, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO physics_problems (problem_text, category, owner_id, status, created_at, \
             updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(problem.text.as_str())
        .bind(problem.category.map(|c| c.as_str()))
        .bind(problem.owner.map(|o| o.value()))
        .bind(ContentStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(ProblemSolution::new(
            ProblemId::new(result.last_insert_rowid()),
            problem,
            now,
        ))
    }

    async fn get(&self, id: ProblemId) -> Result<Option<ProblemSolution>, RepositoryError> {
        let row: Option<ProblemRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_PROBLEM_COLUMNS))
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(query_error)?;
        row.map(ProblemSolution::try_from).transpose()
    }

    async fn update(&self, problem: &ProblemSolution) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE physics_problems SET status = ?, solution = ?, steps = ?, diagram_url = ?, \
             bookmarked = ?, updated_at = ? WHERE id = ?",
        )
        .bind(problem.status.as_str())
        .bind(problem.solution.as_deref())
        .bind(steps_json(problem)?)
        .bind(problem.diagram_url.as_deref())
        .bind(problem.bookmarked)
        .bind(problem.updated_at)
        .bind(problem.id.value())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::ProblemNotFound(problem.id));
        }
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ProblemSolution>, RepositoryError> {
        let rows: Vec<ProblemRow> = sqlx::query_as(&format!(
            "{} WHERE owner_id = ? ORDER BY id DESC LIMIT ?",
            SELECT_PROBLEM_COLUMNS
        ))
        .bind(owner.value())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        rows.into_iter().map(ProblemSolution::try_from).collect()
    }
}
