use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use refineflow::{
    default_pass_condition, execute_review, Agent, AgentInvoker, FeedbackInjection, Invocation,
    Message, MessageRole, PassCondition, ReviewSettings, Result, Validator,
};

fn agent(id: &str) -> Agent {
    Agent {
        id: id.to_string(),
        name: id.to_string(),
        instructions: String::new(),
        output_validator: Arc::new(Validator::any()),
        model_settings: None,
        servers: Vec::new(),
        tools: Vec::new(),
    }
}

/// 按脚本回放评审结果的调用原语
struct ScriptedInvoker {
    reviews: Mutex<VecDeque<Value>>,
    fallback_review: Value,
    proposal_calls: AtomicU32,
    review_calls: AtomicU32,
}

impl ScriptedInvoker {
    fn new(reviews: Vec<Value>, fallback_review: Value) -> Self {
        Self {
            reviews: Mutex::new(reviews.into()),
            fallback_review,
            proposal_calls: AtomicU32::new(0),
            review_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl AgentInvoker for ScriptedInvoker {
    async fn invoke(&self, agent: &Agent, history: &[Message]) -> Result<Invocation> {
        let mut next_history = history.to_vec();
        let output = match agent.id.as_str() {
            "proposer" => {
                let call = self.proposal_calls.fetch_add(1, Ordering::SeqCst) + 1;
                let draft = json!({ "result": format!("draft v{}", call) });
                next_history.push(Message::assistant(draft.to_string()));
                Some(draft)
            }
            "reviewer" => {
                self.review_calls.fetch_add(1, Ordering::SeqCst);
                let review = self
                    .reviews
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| self.fallback_review.clone());
                next_history.push(Message::assistant(review.to_string()));
                Some(review)
            }
            other => panic!("unexpected agent `{}`", other),
        };
        Ok(Invocation {
            output,
            history: next_history,
        })
    }
}

fn settings(condition: PassCondition, max_turns: u32) -> ReviewSettings {
    ReviewSettings {
        pass_condition: condition,
        max_turns,
        feedback_injection: FeedbackInjection::AsUser,
        carry_history: true,
    }
}

fn seed() -> Vec<Message> {
    vec![Message::user("write a haiku")]
}

#[tokio::test]
async fn passing_on_turn_one_returns_the_proposal_output() {
    let invoker = ScriptedInvoker::new(vec![json!({ "score": "pass" })], json!({ "score": "pass" }));
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        settings(default_pass_condition().clone(), 8),
    )
    .await
    .expect("review loop");

    assert!(outcome.passed);
    assert_eq!(outcome.turns, 1);
    // 返回的是提案输出，不是评审输出
    assert_eq!(outcome.output, Some(json!({ "result": "draft v1" })));
    assert_eq!(invoker.proposal_calls.load(Ordering::SeqCst), 1);
    assert_eq!(invoker.review_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhaustion_returns_last_proposal_without_trailing_feedback() {
    let review = json!({ "score": "fail", "feedback": "needs work" });
    let invoker = ScriptedInvoker::new(Vec::new(), review);
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        settings(default_pass_condition().clone(), 1),
    )
    .await
    .expect("review loop");

    assert!(!outcome.passed);
    assert_eq!(outcome.turns, 1);
    assert_eq!(outcome.output, Some(json!({ "result": "draft v1" })));
    // 没有剩余轮次，最后一轮的反馈不会被注入
    assert_eq!(outcome.next_history.len(), 3);
    let user_messages = outcome
        .next_history
        .iter()
        .filter(|message| message.role == MessageRole::User)
        .count();
    assert_eq!(user_messages, 1);
}

#[tokio::test]
async fn malformed_condition_never_passes_and_exhausts_the_budget() {
    let invoker = ScriptedInvoker::new(Vec::new(), json!({ "score": "pass" }));
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        settings(PassCondition::compile("== 'pass'"), 3),
    )
    .await
    .expect("review loop");

    assert!(!outcome.passed);
    assert_eq!(outcome.turns, 3);
    assert_eq!(invoker.proposal_calls.load(Ordering::SeqCst), 3);
    assert_eq!(outcome.output, Some(json!({ "result": "draft v3" })));
}

#[tokio::test]
async fn feedback_defaults_to_a_user_message_between_turns() {
    let invoker = ScriptedInvoker::new(
        vec![
            json!({ "score": "fail", "feedback": "needs work" }),
            json!({ "score": "pass" }),
        ],
        json!({ "score": "pass" }),
    );
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        settings(default_pass_condition().clone(), 8),
    )
    .await
    .expect("review loop");

    assert!(outcome.passed);
    assert_eq!(outcome.turns, 2);
    let injected = outcome
        .next_history
        .iter()
        .find(|message| message.role == MessageRole::User && message.content == "needs work");
    assert!(injected.is_some());
}

#[tokio::test]
async fn feedback_falls_back_to_the_serialized_review() {
    let invoker = ScriptedInvoker::new(
        vec![
            json!({ "score": "fail", "hint": "shorter" }),
            json!({ "score": "pass" }),
        ],
        json!({ "score": "pass" }),
    );
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        settings(default_pass_condition().clone(), 8),
    )
    .await
    .expect("review loop");

    let injected = outcome
        .next_history
        .iter()
        .find(|message| {
            message.role == MessageRole::User
                && message.content.contains("\"hint\"")
                && message.content.contains("\"score\"")
        });
    assert!(injected.is_some());
}

#[tokio::test]
async fn system_injection_uses_a_system_message() {
    let invoker = ScriptedInvoker::new(
        vec![
            json!({ "score": "fail", "feedback": "tighten it" }),
            json!({ "score": "pass" }),
        ],
        json!({ "score": "pass" }),
    );
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        ReviewSettings {
            pass_condition: default_pass_condition().clone(),
            max_turns: 8,
            feedback_injection: FeedbackInjection::AsSystem,
            carry_history: true,
        },
    )
    .await
    .expect("review loop");

    let injected = outcome
        .next_history
        .iter()
        .find(|message| message.role == MessageRole::System && message.content == "tighten it");
    assert!(injected.is_some());
}

#[tokio::test]
async fn append_only_injects_no_feedback_message() {
    let invoker = ScriptedInvoker::new(Vec::new(), json!({ "score": "fail", "feedback": "no" }));
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        ReviewSettings {
            pass_condition: default_pass_condition().clone(),
            max_turns: 2,
            feedback_injection: FeedbackInjection::AppendOnly,
            carry_history: true,
        },
    )
    .await
    .expect("review loop");

    assert!(!outcome.passed);
    let user_messages = outcome
        .next_history
        .iter()
        .filter(|message| message.role == MessageRole::User)
        .count();
    assert_eq!(user_messages, 1);
    let system_messages = outcome
        .next_history
        .iter()
        .filter(|message| message.role == MessageRole::System)
        .count();
    assert_eq!(system_messages, 0);
}

#[tokio::test]
async fn without_carry_history_the_thread_never_adopts_agent_turns() {
    let invoker = ScriptedInvoker::new(Vec::new(), json!({ "score": "fail", "feedback": "no" }));
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        ReviewSettings {
            pass_condition: default_pass_condition().clone(),
            max_turns: 2,
            feedback_injection: FeedbackInjection::AppendOnly,
            carry_history: false,
        },
    )
    .await
    .expect("review loop");

    assert_eq!(outcome.next_history, seed());
}

#[tokio::test]
async fn without_carry_history_feedback_is_still_injected() {
    let invoker = ScriptedInvoker::new(Vec::new(), json!({ "score": "fail", "feedback": "no" }));
    let outcome = execute_review(
        &invoker,
        &agent("proposer"),
        &agent("reviewer"),
        seed(),
        ReviewSettings {
            pass_condition: default_pass_condition().clone(),
            max_turns: 2,
            feedback_injection: FeedbackInjection::AsUser,
            carry_history: false,
        },
    )
    .await
    .expect("review loop");

    // 两轮都失败：第一轮后注入一条反馈，第二轮后没有剩余轮次
    assert_eq!(outcome.next_history.len(), 2);
    assert_eq!(outcome.next_history[1].content, "no");
}
