//! Timed round engine
//!
//! A [`RoundSession`] walks a fixed, ordered list of questions. Each
//! question is presented with its own countdown, locked by the first of
//! either a submission or the countdown reaching zero, scored, and followed
//! by a feedback pause before the next question appears. The pause is not
//! waited on here: the session hands an [`AlarmMessage`] to the host's
//! scheduler and continues when the host delivers it back through
//! [`RoundSession::receive_alarm`].
//!
//! The session is driven entirely by three events, all delivered on the
//! same thread of control:
//!
//! * [`RoundSession::on_tick`] once per elapsed second,
//! * [`RoundSession::submit_answer`] when the player answers,
//! * [`RoundSession::receive_alarm`] when the feedback pause is over.
//!
//! Events that arrive while they do not apply (a tick during the feedback
//! pause, a second submission, a stale alarm) are ignored.

use std::{fmt::Debug, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::SystemTime;

use crate::session::{ResultSink, RoundResult};

use super::{
    super::constants::round::*,
    common::{Answer, Verdict, validate_duration},
    question::{CorrectAnswer, Level, Question, QuestionType},
};

/// Phase of a round session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// The question at this index is shown and its countdown is running
    Presenting(usize),
    /// The question at this index no longer accepts answers; feedback is shown
    Locked(usize),
    /// Every question has been resolved and the result was delivered
    Finished,
}

/// Messages used for scheduled state transitions in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The feedback pause after the question at `index` is over
    ProceedFromFeedback {
        /// Index of the question that was locked
        index: usize,
    },
}

fn default_feedback_delay() -> Duration {
    DEFAULT_FEEDBACK_DELAY
}

/// Pacing options of a round
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Options {
    /// Pause between locking a question and presenting the next one
    #[garde(custom(validate_duration::<MIN_FEEDBACK_DELAY, MAX_FEEDBACK_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_feedback_delay")]
    feedback_delay: Duration,
}

impl Default for Options {
    /// Default pause is 1.5 seconds
    fn default() -> Self {
        Self {
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

impl Options {
    /// Creates options with the given feedback pause
    pub fn new(feedback_delay: Duration) -> Self {
        Self { feedback_delay }
    }

    /// Pause between locking a question and presenting the next one
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }
}

/// Reasons a round session cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No questions were supplied
    #[error("a round needs at least one question")]
    EmptyRound,
    /// More questions were supplied than a round may hold
    #[error("a round holds at most {max} questions, got {count}")]
    TooManyQuestions {
        /// Number of questions supplied
        count: usize,
        /// Upper bound
        max: usize,
    },
    /// A question violates the question limits
    #[error("question {id} is malformed: {reason}")]
    InvalidQuestion {
        /// Identifier of the offending question
        id: String,
        /// Validation report
        reason: String,
    },
    /// The pacing options are out of bounds
    #[error("round options are malformed: {0}")]
    InvalidOptions(String),
}

/// Snapshot of what a view of the round should display
///
/// Produced on demand by [`RoundSession::state_message`], e.g. when a view
/// is (re)rendered.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// A question is open for answers
    QuestionAnnouncement {
        /// Index of the current question (0-indexing)
        index: usize,
        /// Total count of questions
        count: usize,
        /// Prompt
        question: String,
        /// Type of the question
        question_type: QuestionType,
        /// Option labels, empty for short answers
        options: Vec<String>,
        /// Difficulty label
        level: Level,
        /// Seconds allotted to the question
        time_limit: u64,
        /// Seconds left to answer
        time_remaining: u64,
        /// Score accumulated so far
        score: u64,
    },
    /// A question was locked and its verdict is shown
    Feedback {
        /// Index of the locked question
        index: usize,
        /// Total count of questions
        count: usize,
        /// How the question was resolved
        verdict: Verdict,
        /// The expected answer
        answer: CorrectAnswer,
        /// Score accumulated so far, this question included
        score: u64,
    },
    /// The round is over
    Finished(RoundResult),
}

impl SyncMessage {
    /// Converts the message to a JSON string for a view
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Rounds the time between two instants to whole seconds
fn elapsed_seconds(started_at: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(started_at)
        .unwrap_or_default()
        .as_secs_f64()
        .round() as u64
}

/// One player's live attempt at a round
pub struct RoundSession<S: ResultSink> {
    /// The questions of the round, in play order
    questions: Vec<Question>,
    /// Current phase
    state: RoundState,
    /// Points earned so far
    score: u64,
    /// Seconds left for the current question
    time_remaining: u64,
    /// Captured once at construction
    started_at: SystemTime,
    /// Verdict of every locked question, in order
    outcomes: Vec<Verdict>,
    /// Pacing options
    options: Options,
    /// Final result, set on finish
    result: Option<RoundResult>,
    /// Taken on finish
    sink: Option<S>,
}

impl<S: ResultSink> Debug for RoundSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundSession")
            .field("state", &self.state)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .finish_non_exhaustive()
    }
}

impl<S: ResultSink> RoundSession<S> {
    /// Starts a round with the first question presented
    ///
    /// # Arguments
    ///
    /// * `questions` - The questions of one round, already in play order
    /// * `options` - Pacing options
    /// * `sink` - Receives the result once the last question is resolved
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if `questions` is empty or too long, if any
    /// question violates the question limits (e.g. a choice question with
    /// fewer than two options), or if `options` is out of bounds.
    pub fn new(questions: Vec<Question>, options: Options, sink: S) -> Result<Self, Error> {
        let Some(first) = questions.first() else {
            return Err(Error::EmptyRound);
        };

        if questions.len() > MAX_QUESTION_COUNT {
            return Err(Error::TooManyQuestions {
                count: questions.len(),
                max: MAX_QUESTION_COUNT,
            });
        }

        options
            .validate()
            .map_err(|report| Error::InvalidOptions(report.to_string()))?;

        for question in &questions {
            question
                .validate()
                .map_err(|report| Error::InvalidQuestion {
                    id: question.id().to_owned(),
                    reason: report.to_string(),
                })?;
        }

        let time_remaining = first.time_limit();

        log::debug!(
            "starting round with {} questions, first question {}",
            questions.len(),
            first.id()
        );

        Ok(Self {
            outcomes: Vec::with_capacity(questions.len()),
            questions,
            state: RoundState::Presenting(0),
            score: 0,
            time_remaining,
            started_at: SystemTime::now(),
            options,
            result: None,
            sink: Some(sink),
        })
    }

    /// Current phase
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Index of the current question, or of the last one once finished
    pub fn current_index(&self) -> usize {
        match self.state {
            RoundState::Presenting(index) | RoundState::Locked(index) => index,
            RoundState::Finished => self.questions.len() - 1,
        }
    }

    /// The current question
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index()]
    }

    /// The questions of the round in play order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Whether the current question stopped accepting answers
    pub fn is_locked(&self) -> bool {
        !matches!(self.state, RoundState::Presenting(_))
    }

    /// Whether the round is over
    pub fn is_finished(&self) -> bool {
        self.state == RoundState::Finished
    }

    /// Points earned so far
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Seconds left for the current question
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Sum of the points of every question
    pub fn total_possible(&self) -> u64 {
        self.questions.iter().map(Question::points).sum()
    }

    /// Verdicts of the questions resolved so far
    pub fn outcomes(&self) -> &[Verdict] {
        &self.outcomes
    }

    /// The final result, once finished
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    /// Pacing options
    pub fn options(&self) -> Options {
        self.options
    }

    /// Advances the countdown by one second
    ///
    /// # Arguments
    ///
    /// * `schedule_message` - Schedules the feedback alarm if the countdown expires
    pub fn on_tick<A: FnMut(AlarmMessage, Duration)>(&mut self, schedule_message: A) {
        self.on_ticks(1, schedule_message);
    }

    /// Advances the countdown by several seconds at once
    ///
    /// Hosts that cannot guarantee a steady tick (a suspended tab, a busy
    /// loop) deliver the missed seconds together. The countdown is clamped at
    /// zero and expires exactly once.
    ///
    /// # Arguments
    ///
    /// * `seconds` - Number of elapsed seconds
    /// * `schedule_message` - Schedules the feedback alarm if the countdown expires
    pub fn on_ticks<A: FnMut(AlarmMessage, Duration)>(
        &mut self,
        seconds: u64,
        schedule_message: A,
    ) {
        let RoundState::Presenting(index) = self.state else {
            log::trace!("ignoring tick in {:?}", self.state);
            return;
        };

        self.time_remaining = self.time_remaining.saturating_sub(seconds);

        if self.time_remaining == 0 {
            log::debug!("time expired on question {index}");
            self.lock(index, None, schedule_message);
        }
    }

    /// Submits an answer for the current question
    ///
    /// Only the first submission for a question counts. `None` is treated
    /// exactly like the countdown expiring.
    ///
    /// # Arguments
    ///
    /// * `answer` - The candidate answer
    /// * `schedule_message` - Schedules the feedback alarm
    pub fn submit_answer<A: FnMut(AlarmMessage, Duration)>(
        &mut self,
        answer: Option<Answer>,
        schedule_message: A,
    ) {
        let RoundState::Presenting(index) = self.state else {
            log::trace!("ignoring submission in {:?}", self.state);
            return;
        };

        self.lock(index, answer.as_ref(), schedule_message);
    }

    /// Handles a scheduled alarm
    ///
    /// # Arguments
    ///
    /// * `message` - The alarm previously handed to the scheduler
    ///
    /// # Returns
    ///
    /// `true` if this alarm finished the round, `false` otherwise
    pub fn receive_alarm(&mut self, message: &AlarmMessage) -> bool {
        let AlarmMessage::ProceedFromFeedback { index } = *message;

        if self.state != RoundState::Locked(index) {
            log::trace!("ignoring stale alarm for question {index} in {:?}", self.state);
            return false;
        }

        let next = index + 1;
        if let Some(question) = self.questions.get(next) {
            self.time_remaining = question.time_limit();
            self.state = RoundState::Presenting(next);
            log::debug!("presenting question {next} ({})", question.id());
            false
        } else {
            self.finish();
            true
        }
    }

    /// Builds a snapshot of the round for a view
    pub fn state_message(&self) -> SyncMessage {
        let count = self.questions.len();

        match self.state {
            RoundState::Presenting(index) => {
                let question = &self.questions[index];
                SyncMessage::QuestionAnnouncement {
                    index,
                    count,
                    question: question.text().to_owned(),
                    question_type: question.kind().question_type(),
                    options: question.kind().options().to_vec(),
                    level: question.level(),
                    time_limit: question.time_limit(),
                    time_remaining: self.time_remaining,
                    score: self.score,
                }
            }
            RoundState::Locked(index) => SyncMessage::Feedback {
                index,
                count,
                verdict: self.outcomes[index],
                answer: self.questions[index].kind().correct_answer(),
                score: self.score,
            },
            RoundState::Finished => SyncMessage::Finished(RoundResult {
                score: self.score,
                total_possible: self.total_possible(),
                elapsed_seconds: self.result.map_or(0, |result| result.elapsed_seconds),
            }),
        }
    }

    fn lock<A: FnMut(AlarmMessage, Duration)>(
        &mut self,
        index: usize,
        answer: Option<&Answer>,
        mut schedule_message: A,
    ) {
        self.state = RoundState::Locked(index);

        let question = &self.questions[index];
        let verdict = question.evaluate(answer);
        if verdict.is_correct() {
            self.score += question.points();
        }
        self.outcomes.push(verdict);

        log::debug!(
            "question {index} ({}) locked as {verdict:?}, score {}",
            question.id(),
            self.score
        );

        schedule_message(
            AlarmMessage::ProceedFromFeedback { index },
            self.options.feedback_delay,
        );
    }

    fn finish(&mut self) {
        let result = RoundResult {
            score: self.score,
            total_possible: self.total_possible(),
            elapsed_seconds: elapsed_seconds(self.started_at, SystemTime::now()),
        };

        self.state = RoundState::Finished;
        self.result = Some(result);

        log::info!(
            "round finished with {}/{} in {}s",
            result.score,
            result.total_possible,
            result.elapsed_seconds
        );

        if let Some(sink) = self.sink.take() {
            sink.receive_result(result);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::quiz::question::QuestionKind;

    type Results = Rc<RefCell<Vec<RoundResult>>>;

    fn create_session(
        questions: Vec<Question>,
    ) -> (RoundSession<impl ResultSink>, Results) {
        let results = Results::default();
        let sink = {
            let results = results.clone();
            move |result: RoundResult| results.borrow_mut().push(result)
        };
        let session = RoundSession::new(questions, Options::default(), sink).unwrap();
        (session, results)
    }

    fn multiple(id: &str, correct: usize, points: u64, time_limit: u64) -> Question {
        Question::new(
            id,
            format!("Question {id}"),
            QuestionKind::multiple_choice(["a", "b", "c", "d"], correct),
            points,
            time_limit,
        )
    }

    /// Delivers every pending alarm, as a host would once the pause is over
    fn deliver<S: ResultSink>(
        session: &mut RoundSession<S>,
        alarms: &mut Vec<(AlarmMessage, Duration)>,
    ) -> bool {
        alarms
            .drain(..)
            .fold(false, |finished, (alarm, _)| session.receive_alarm(&alarm) || finished)
    }

    #[test]
    fn test_new_presents_first_question() {
        let (session, results) = create_session(vec![multiple("1", 0, 10, 7), multiple("2", 1, 5, 3)]);

        assert_eq!(session.state(), RoundState::Presenting(0));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_question().id(), "1");
        assert_eq!(session.time_remaining(), 7);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_possible(), 15);
        assert!(!session.is_locked());
        assert!(!session.is_finished());
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_new_empty_round() {
        let result = RoundSession::new(Vec::new(), Options::default(), |_: RoundResult| {});
        assert_eq!(result.unwrap_err(), Error::EmptyRound);
    }

    #[test]
    fn test_new_too_many_questions() {
        let questions = (0..=MAX_QUESTION_COUNT)
            .map(|i| multiple(&i.to_string(), 0, 10, 5))
            .collect();
        let result = RoundSession::new(questions, Options::default(), |_: RoundResult| {});
        assert!(matches!(
            result.unwrap_err(),
            Error::TooManyQuestions { max: MAX_QUESTION_COUNT, .. }
        ));
    }

    #[test]
    fn test_new_rejects_short_options() {
        let broken = Question::new(
            "tf",
            "Is 300 + 400 = 800?",
            QuestionKind::true_false(["True"], 0),
            10,
            15,
        );
        let result = RoundSession::new(
            vec![multiple("1", 0, 10, 5), broken],
            Options::default(),
            |_: RoundResult| {},
        );

        match result.unwrap_err() {
            Error::InvalidQuestion { id, .. } => assert_eq!(id, "tf"),
            error => panic!("unexpected error {error:?}"),
        }
    }

    #[test]
    fn test_new_rejects_long_feedback_delay() {
        let result = RoundSession::new(
            vec![multiple("1", 0, 10, 5)],
            Options::new(Duration::from_secs(MAX_FEEDBACK_DELAY + 1)),
            |_: RoundResult| {},
        );
        assert!(matches!(result.unwrap_err(), Error::InvalidOptions(_)));

        let result = RoundSession::new(
            vec![multiple("1", 0, 10, 5)],
            Options::new(Duration::from_secs(MAX_FEEDBACK_DELAY) + Duration::from_millis(900)),
            |_: RoundResult| {},
        );
        assert!(matches!(result.unwrap_err(), Error::InvalidOptions(_)));
    }

    #[test]
    fn test_scenario_correct_correct_incorrect() {
        let (mut session, results) = create_session(vec![
            multiple("1", 0, 10, 5),
            multiple("2", 1, 10, 5),
            multiple("3", 2, 10, 5),
        ]);
        let mut alarms = Vec::new();

        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        assert_eq!(session.state(), RoundState::Locked(0));
        assert_eq!(session.score(), 10);
        assert!(!deliver(&mut session, &mut alarms));

        session.on_tick(|a, d| alarms.push((a, d)));
        session.submit_answer(Some(Answer::Index(1)), |a, d| alarms.push((a, d)));
        assert!(!deliver(&mut session, &mut alarms));

        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        assert!(deliver(&mut session, &mut alarms));

        assert!(session.is_finished());
        assert_eq!(
            session.outcomes(),
            &[Verdict::Correct, Verdict::Correct, Verdict::Incorrect]
        );

        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 20);
        assert_eq!(results[0].total_possible, 30);
        assert!(results[0].elapsed_seconds <= 1);
        assert_eq!(session.result(), Some(results[0]));
    }

    #[test]
    fn test_scenario_short_answer() {
        let (mut session, results) = create_session(vec![Question::new(
            "7",
            "3 + 4 = ?",
            QuestionKind::short_answer("7"),
            20,
            10,
        )]);
        let mut alarms = Vec::new();

        session.submit_answer(Some(" 7 ".into()), |a, d| alarms.push((a, d)));
        assert_eq!(session.outcomes(), &[Verdict::Correct]);
        assert!(deliver(&mut session, &mut alarms));

        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].score, results[0].total_possible), (20, 20));
    }

    #[test]
    fn test_scenario_true_false_timeout() {
        let (mut session, results) = create_session(vec![Question::new(
            "23",
            "A square has four equal sides.",
            QuestionKind::true_false(["True", "False"], 0),
            10,
            3,
        )]);
        let mut alarms = Vec::new();

        session.on_tick(|a, d| alarms.push((a, d)));
        session.on_tick(|a, d| alarms.push((a, d)));
        assert_eq!(session.time_remaining(), 1);
        assert!(alarms.is_empty());

        session.on_tick(|a, d| alarms.push((a, d)));
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.state(), RoundState::Locked(0));
        assert_eq!(session.outcomes(), &[Verdict::Unanswered]);
        assert_eq!(
            alarms,
            vec![(
                AlarmMessage::ProceedFromFeedback { index: 0 },
                DEFAULT_FEEDBACK_DELAY
            )]
        );

        assert!(deliver(&mut session, &mut alarms));
        let results = results.borrow();
        assert_eq!((results[0].score, results[0].total_possible), (0, 10));
    }

    #[test]
    fn test_null_submission_matches_timeout() {
        let (mut session, _results) = create_session(vec![Question::new(
            "23",
            "A square has four equal sides.",
            QuestionKind::true_false(["True", "False"], 0),
            10,
            3,
        )]);
        let mut alarms = Vec::new();

        session.submit_answer(None, |a, d| alarms.push((a, d)));

        assert_eq!(session.score(), 0);
        assert_eq!(session.outcomes(), &[Verdict::Unanswered]);
        assert_eq!(alarms.len(), 1);
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let (mut session, _results) =
            create_session(vec![multiple("1", 0, 10, 5), multiple("2", 0, 10, 5)]);
        let mut alarms = Vec::new();

        session.submit_answer(Some(Answer::Index(1)), |a, d| alarms.push((a, d)));
        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));

        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.outcomes(), &[Verdict::Incorrect]);
        assert_eq!(alarms.len(), 1);
    }

    #[test]
    fn test_ticks_during_feedback_are_ignored() {
        let (mut session, _results) =
            create_session(vec![multiple("1", 0, 10, 5), multiple("2", 0, 10, 8)]);
        let mut alarms = Vec::new();

        session.on_tick(|a, d| alarms.push((a, d)));
        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        session.on_ticks(10, |a, d| alarms.push((a, d)));

        assert_eq!(session.time_remaining(), 4);
        assert_eq!(alarms.len(), 1);

        deliver(&mut session, &mut alarms);
        assert_eq!(session.state(), RoundState::Presenting(1));
        assert_eq!(session.time_remaining(), 8);
    }

    #[test]
    fn test_coalesced_ticks_expire_once() {
        let (mut session, _results) =
            create_session(vec![multiple("1", 0, 10, 5), multiple("2", 0, 10, 5)]);
        let mut alarms = Vec::new();

        session.on_ticks(120, |a, d| alarms.push((a, d)));
        session.on_ticks(120, |a, d| alarms.push((a, d)));
        session.on_tick(|a, d| alarms.push((a, d)));

        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.outcomes(), &[Verdict::Unanswered]);
        assert_eq!(alarms.len(), 1);
    }

    #[test]
    fn test_expiry_wins_over_late_submission() {
        let (mut session, _results) = create_session(vec![multiple("1", 0, 10, 1)]);
        let mut alarms = Vec::new();

        session.on_tick(|a, d| alarms.push((a, d)));
        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));

        assert_eq!(session.score(), 0);
        assert_eq!(session.outcomes(), &[Verdict::Unanswered]);
        assert_eq!(alarms.len(), 1);
    }

    #[test]
    fn test_stale_alarms_are_ignored() {
        let (mut session, results) =
            create_session(vec![multiple("1", 0, 10, 5), multiple("2", 0, 10, 5)]);
        let mut alarms = Vec::new();

        assert!(!session.receive_alarm(&AlarmMessage::ProceedFromFeedback { index: 0 }));
        assert_eq!(session.state(), RoundState::Presenting(0));

        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        let alarm = alarms[0].0.clone();
        assert!(!session.receive_alarm(&alarm));
        assert!(!session.receive_alarm(&alarm));
        assert_eq!(session.state(), RoundState::Presenting(1));

        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        let alarm = alarms[1].0.clone();
        assert!(session.receive_alarm(&alarm));
        assert!(!session.receive_alarm(&alarm));

        assert_eq!(results.borrow().len(), 1);
        assert_eq!(session.score(), 20);
    }

    #[test]
    fn test_events_after_finish_are_ignored() {
        let (mut session, results) = create_session(vec![multiple("1", 0, 10, 5)]);
        let mut alarms = Vec::new();

        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));
        deliver(&mut session, &mut alarms);

        session.on_ticks(3, |a, d| alarms.push((a, d)));
        session.submit_answer(Some(Answer::Index(0)), |a, d| alarms.push((a, d)));

        assert!(alarms.is_empty());
        assert_eq!(session.score(), 10);
        assert_eq!(session.current_index(), 0);
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn test_score_is_sum_of_correct_points() {
        let questions = vec![
            multiple("1", 0, 10, 5),
            multiple("2", 1, 15, 5),
            multiple("3", 2, 20, 5),
            multiple("4", 3, 25, 5),
        ];
        let (mut session, results) = create_session(questions);
        let mut alarms = Vec::new();

        let mut previous_index = 0;
        let mut previous_score = 0;
        for submission in [Some(0), None, Some(2), Some(0)] {
            session.submit_answer(submission.map(Answer::Index), |a, d| alarms.push((a, d)));
            assert!(session.score() >= previous_score);
            previous_score = session.score();
            deliver(&mut session, &mut alarms);
            assert!(session.current_index() >= previous_index);
            previous_index = session.current_index();
        }

        assert_eq!(results.borrow()[0].score, 30);
        assert_eq!(results.borrow()[0].total_possible, 70);
    }

    #[test]
    fn test_custom_feedback_delay_is_scheduled() {
        let mut session = RoundSession::new(
            vec![multiple("1", 0, 10, 5)],
            Options::new(Duration::ZERO),
            |_: RoundResult| {},
        )
        .unwrap();
        let mut alarms = Vec::new();

        session.submit_answer(Some(Answer::Index(3)), |a, d| alarms.push((a, d)));

        assert_eq!(alarms[0].1, Duration::ZERO);
    }

    #[test]
    fn test_state_messages() {
        let (mut session, _results) = create_session(vec![
            multiple("1", 2, 10, 5),
            Question::new("2", "Months in a year?", QuestionKind::short_answer("12"), 15, 20),
        ]);
        let mut alarms = Vec::new();

        session.on_tick(|a, d| alarms.push((a, d)));
        assert_eq!(
            session.state_message(),
            SyncMessage::QuestionAnnouncement {
                index: 0,
                count: 2,
                question: "Question 1".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: vec!["a", "b", "c", "d"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                level: Level::Easy,
                time_limit: 5,
                time_remaining: 4,
                score: 0,
            }
        );

        session.submit_answer(Some(Answer::Index(2)), |a, d| alarms.push((a, d)));
        assert_eq!(
            session.state_message(),
            SyncMessage::Feedback {
                index: 0,
                count: 2,
                verdict: Verdict::Correct,
                answer: CorrectAnswer::Index(2),
                score: 10,
            }
        );

        deliver(&mut session, &mut alarms);
        session.submit_answer(Some("eleven".into()), |a, d| alarms.push((a, d)));
        assert!(session.state_message().to_message().contains("\"12\""));

        deliver(&mut session, &mut alarms);
        match session.state_message() {
            SyncMessage::Finished(result) => {
                assert_eq!((result.score, result.total_possible), (10, 25));
            }
            message => panic!("unexpected message {message:?}"),
        }
    }

    #[test]
    fn test_elapsed_seconds_rounding() {
        let start = SystemTime::UNIX_EPOCH;

        assert_eq!(elapsed_seconds(start, start + Duration::from_millis(2400)), 2);
        assert_eq!(elapsed_seconds(start, start + Duration::from_millis(2500)), 3);
        assert_eq!(elapsed_seconds(start + Duration::from_secs(5), start), 0);
    }

    #[test]
    fn test_options_serde() {
        let options: Options = serde_json::from_str(r#"{"feedback_delay": 2000}"#).unwrap();
        assert_eq!(options.feedback_delay(), Duration::from_secs(2));

        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.feedback_delay(), Duration::from_millis(1500));
        assert!(options.validate().is_ok());
    }
}
