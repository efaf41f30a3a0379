use serde_json::{json, Map, Value};

use crate::agent::Agent;
use crate::config::FeedbackInjection;
use crate::error::Result;
use crate::expr::PassCondition;
use crate::flow::history::Message;
use crate::llm::AgentInvoker;

/// 评审循环的配置
pub struct ReviewSettings {
    pub pass_condition: PassCondition,
    pub max_turns: u32,
    pub feedback_injection: FeedbackInjection,
    pub carry_history: bool,
}

/// 评审循环的执行结果
///
/// 轮次耗尽不是错误：调用方拿到的是最后一份提案。
pub struct ReviewOutcome {
    pub output: Option<Value>,
    pub next_history: Vec<Message>,
    pub passed: bool,
    pub turns: u32,
}

/// 执行提案/评审循环
///
/// 状态机 {Proposing, Reviewing, Passed, Exhausted}。轮次计数从 0 起，
/// 每轮开始时递增，上限 max_turns 是轮次预算而非时钟超时。提案和评审
/// 严格串行。通过时返回的是最后一份提案，不是评审输出。
pub async fn execute_review(
    invoker: &dyn AgentInvoker,
    proposal_agent: &Agent,
    reviewer_agent: &Agent,
    mut history: Vec<Message>,
    settings: ReviewSettings,
) -> Result<ReviewOutcome> {
    let mut last_proposal: Option<Value> = None;
    let mut turn = 0u32;
    let mut passed = false;

    while turn < settings.max_turns {
        turn += 1;

        // Proposing
        let proposal = invoker.invoke(proposal_agent, &history).await?;
        last_proposal = proposal.output;
        if settings.carry_history {
            history = proposal.history;
        }

        // Reviewing
        let review_invocation = invoker.invoke(reviewer_agent, &history).await?;
        let review = review_invocation
            .output
            .unwrap_or_else(|| Value::Object(Map::new()));
        if settings.carry_history {
            history = review_invocation.history;
        }

        // 在评审字段 + turn/maxTurns 的隔离作用域上求值
        let mut context = review.as_object().cloned().unwrap_or_default();
        context.insert("turn".to_string(), json!(turn));
        context.insert("maxTurns".to_string(), json!(settings.max_turns));

        if settings.pass_condition.evaluate(&context) {
            passed = true;
            break;
        }

        // 仅在还有剩余轮次时注入反馈
        if turn < settings.max_turns {
            let feedback = review
                .get("feedback")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| review.to_string());
            match settings.feedback_injection {
                FeedbackInjection::AsUser => history.push(Message::user(feedback)),
                FeedbackInjection::AsSystem => history.push(Message::system(feedback)),
                FeedbackInjection::AppendOnly => {}
            }
        }
    }

    if passed {
        tracing::debug!(turns = turn, "review loop passed");
    } else {
        tracing::debug!(turns = turn, "review loop exhausted its turn budget");
    }

    Ok(ReviewOutcome {
        output: last_proposal,
        next_history: history,
        passed,
        turns: turn,
    })
}
