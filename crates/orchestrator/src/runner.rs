//! The Dialogue Runner: executes an N-turn tutor/student dialogue against
//! a model through the Gateway, persisting each turn and fanning out a
//! judge job per turn (spec §4.5).

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use socratic_bench_domain::run::RunStatus;
use socratic_bench_domain::turn::{turn_body_key, Turn, TurnBody};
use socratic_bench_gateway::{ChatMessage, GenerateParams, GenerateRequest, GatewayError, ModelGateway};
use socratic_bench_objectstore::{ObjectStore, ObjectStoreError, ObjectStoreJsonExt};
use socratic_bench_queue::{JobQueue, JUDGE_JOBS, RUN_JUDGED};
use socratic_bench_scenarios::{self, render_student_prompt, Scenario, StudentReplyPolicy};
use socratic_bench_storage::{JudgeRepository, ManifestRepository, RunRepository, TurnRepository};

use crate::error::OrchestratorError;
use crate::messages::{DialogueJob, JudgeJob, RunJudgedEvent};

/// Outcome of one Dialogue Runner invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerOutcome {
    /// The run was already terminal (completed or failed); no-op.
    AlreadyTerminal,
    /// Every remaining turn up to `max_turns` recorded successfully.
    RecordingComplete { turns_recorded: i32 },
    /// The gateway exhausted retries partway through; the run is now
    /// `failed` with the turns recorded so far preserved.
    FailedPartway { turns_recorded: i32, reason: String },
}

/// Builds the fixed tutor-role system prompt for a scenario. The scenario
/// registry's `persona`/`vector` describe the *student* being simulated;
/// this instructs the model under test on its own role as Socratic tutor.
fn tutor_system_prompt(scenario: &Scenario) -> String {
    format!(
        "You are a Socratic tutor. Engage the student through questions \
        that draw out their own reasoning; do not give direct answers, \
        advice, or lectures, and do not lead the student toward a \
        predetermined conclusion. The student's persona: {}. The move \
        you are probing for in this dialogue is {:?}.",
        scenario.persona, scenario.vector
    )
}

pub struct DialogueRunner {
    manifest_repo: ManifestRepository,
    run_repo: RunRepository,
    turn_repo: TurnRepository,
    judge_repo: JudgeRepository,
    object_store: Arc<dyn ObjectStore>,
    queue: JobQueue,
    gateway: ModelGateway,
    max_redeliveries: i32,
}

impl DialogueRunner {
    pub fn new(
        manifest_repo: ManifestRepository,
        run_repo: RunRepository,
        turn_repo: TurnRepository,
        judge_repo: JudgeRepository,
        object_store: Arc<dyn ObjectStore>,
        queue: JobQueue,
        gateway: ModelGateway,
        max_redeliveries: i32,
    ) -> Self {
        Self {
            manifest_repo,
            run_repo,
            turn_repo,
            judge_repo,
            object_store,
            queue,
            gateway,
            max_redeliveries,
        }
    }

    pub async fn handle(&self, job: &DialogueJob) -> Result<RunnerOutcome, OrchestratorError> {
        let run = self
            .run_repo
            .get(&job.run_id)
            .await?
            .ok_or_else(|| OrchestratorError::RunNotFound(job.run_id.clone()))?;

        if matches!(
            run.status,
            RunStatus::Completed | RunStatus::CompletedRecording | RunStatus::Failed
        ) {
            return Ok(RunnerOutcome::AlreadyTerminal);
        }

        let scenario = match socratic_bench_scenarios::require_scenario(&run.scenario_id) {
            Ok(scenario) => scenario,
            Err(err) => {
                self.run_repo
                    .mark_failed(&run.run_id, &format!("scenario not found: {err}"))
                    .await?;
                return Err(OrchestratorError::Scenario(err));
            }
        };

        let manifest = self
            .manifest_repo
            .get(&run.manifest_id)
            .await?
            .ok_or_else(|| OrchestratorError::ManifestNotFound(run.manifest_id.clone()))?;
        let model_config = manifest
            .models
            .iter()
            .find(|m| m.model_id == run.model_id)
            .cloned()
            .ok_or_else(|| OrchestratorError::Gateway(GatewayError::UnknownModel(run.model_id.clone())))?;

        if run.n_turns_planned == 0 {
            // spec §8 zero-turn boundary: a plan with no turns completes
            // immediately, with an empty RunSummary, rather than sitting in
            // `running` forever waiting for a turn that will never arrive.
            let newly_committed = self.run_repo.commit_empty_run(&run.run_id).await?;
            if newly_committed {
                let event = RunJudgedEvent {
                    run_id: run.run_id.clone(),
                    manifest_id: run.manifest_id.clone(),
                    model_id: run.model_id.clone(),
                    week: run.week.clone(),
                    judged_at: Utc::now(),
                };
                self.queue
                    .enqueue(RUN_JUDGED, &event, self.max_redeliveries)
                    .await?;
                info!(run_id = %run.run_id, "zero-turn run completed immediately, run-judged event emitted");
            }
            return Ok(RunnerOutcome::RecordingComplete { turns_recorded: 0 });
        }

        self.run_repo.mark_running(&run.run_id).await?;

        let system_prompt = tutor_system_prompt(&scenario);

        let existing_refs = self.turn_repo.list_body_refs(&run.run_id).await?;
        let mut history: Vec<ChatMessage> = Vec::with_capacity(existing_refs.len() * 2);
        for (_, body_ref) in &existing_refs {
            let body: TurnBody = self
                .object_store
                .get_json(body_ref)
                .await?
                .ok_or_else(|| ObjectStoreError::NotFound(body_ref.clone()))?;
            history.push(ChatMessage::user(body.student_prompt));
            history.push(ChatMessage::assistant(body.ai_response));
        }

        let mut turns_recorded = existing_refs.len() as i32;

        for turn_index in turns_recorded..(job.max_turns as i32) {
            let student_prompt = match self
                .next_student_prompt(&scenario, turn_index, history.last())
                .await
            {
                Ok(prompt) => prompt,
                Err(err) => {
                    let reason = format!("simulated student failed: {err}");
                    warn!(run_id = %run.run_id, turn_index, %reason, "dialogue runner stopping early");
                    self.run_repo
                        .mark_failed_with_reduced_plan(&run.run_id, turns_recorded, &reason)
                        .await?;
                    return Ok(RunnerOutcome::FailedPartway { turns_recorded, reason });
                }
            };

            let mut messages = history.clone();
            messages.push(ChatMessage::user(student_prompt.clone()));

            let params = GenerateParams {
                temperature: model_config.temperature,
                max_tokens: model_config.max_tokens,
            };

            let started = Instant::now();
            let response = match self
                .gateway
                .generate(GenerateRequest {
                    model_id: &run.model_id,
                    system: Some(&system_prompt),
                    messages: &messages,
                    params,
                })
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    let reason = format!("gateway error: {err}");
                    warn!(run_id = %run.run_id, turn_index, %reason, "dialogue runner failing run");
                    self.run_repo.mark_failed(&run.run_id, &reason).await?;
                    return Ok(RunnerOutcome::FailedPartway { turns_recorded, reason });
                }
            };
            let latency_ms = started.elapsed().as_millis() as i64;

            let created_at = Utc::now();
            let body = TurnBody {
                run_id: run.run_id.clone(),
                turn_index,
                student_prompt: student_prompt.clone(),
                ai_response: response.text.clone(),
                tokens_in: response.usage.prompt_tokens as i32,
                tokens_out: response.usage.completion_tokens as i32,
                latency_ms,
                created_at,
            };
            let body_ref = turn_body_key(&run.run_id, turn_index);
            self.object_store.put_json_if_absent(&body_ref, &body).await?;

            let turn = Turn {
                run_id: run.run_id.clone(),
                turn_index,
                student_prompt: student_prompt.clone(),
                ai_response: response.text.clone(),
                tokens_in: body.tokens_in,
                tokens_out: body.tokens_out,
                latency_ms,
                created_at,
                body_ref: body_ref.clone(),
            };

            let turn_was_new = self.turn_repo.create_if_absent(&turn, "tutor").await?;

            if turn_was_new {
                self.run_repo.increment_turns_recorded(&run.run_id).await?;
                self.enqueue_judge_job(&run.run_id, turn_index, &body_ref, &manifest.judge_model)
                    .await?;
            } else if !self.judge_repo.exists(&run.run_id, turn_index).await? {
                // Retry of a partially completed run: the turn pointer
                // already exists but no judge has claimed it yet, so a
                // judge job is still owed (spec §4.5 step 4).
                self.enqueue_judge_job(&run.run_id, turn_index, &body_ref, &manifest.judge_model)
                    .await?;
            }

            history.push(ChatMessage::user(student_prompt));
            history.push(ChatMessage::assistant(response.text));
            turns_recorded += 1;
        }

        info!(run_id = %run.run_id, turns_recorded, "dialogue recording complete");
        Ok(RunnerOutcome::RecordingComplete { turns_recorded })
    }

    async fn enqueue_judge_job(
        &self,
        run_id: &str,
        turn_index: i32,
        body_ref: &str,
        judge_model: &str,
    ) -> Result<(), OrchestratorError> {
        let job = JudgeJob {
            run_id: run_id.to_string(),
            turn_index,
            body_ref: body_ref.to_string(),
            judge_model: judge_model.to_string(),
        };
        self.queue
            .enqueue(JUDGE_JOBS, &job, self.max_redeliveries)
            .await?;
        Ok(())
    }

    /// Produce the next student utterance for `turn_index`, per the
    /// scenario's reply policy (spec §6). Turn 0 always uses the
    /// scenario's fixed seed prompt.
    async fn next_student_prompt(
        &self,
        scenario: &Scenario,
        turn_index: i32,
        last_tutor_message: Option<&ChatMessage>,
    ) -> Result<String, GatewayError> {
        if turn_index == 0 {
            return Ok(scenario.seed_prompt.clone());
        }

        match &scenario.student_reply_policy {
            StudentReplyPolicy::FixedList(_) => {
                let list_index = (turn_index - 1) as usize;
                Ok(socratic_bench_scenarios::next_fixed_utterance(
                    &scenario.student_reply_policy,
                    list_index,
                )
                .map(str::to_string)
                .unwrap_or_else(|| {
                    "I don't have a further follow-up -- please continue.".to_string()
                }))
            }
            StudentReplyPolicy::Simulated {
                model_id,
                prompt_template,
            } => {
                let tutor_utterance = last_tutor_message.map(|m| m.text.as_str()).unwrap_or("");
                let rendered = render_student_prompt(prompt_template, tutor_utterance);
                let messages = vec![ChatMessage::user(rendered)];
                let response = self
                    .gateway
                    .generate(GenerateRequest {
                        model_id,
                        system: None,
                        messages: &messages,
                        params: GenerateParams {
                            temperature: 0.7,
                            max_tokens: 150,
                        },
                    })
                    .await?;
                Ok(response.text)
            }
        }
    }
}
