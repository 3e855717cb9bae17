//! What the user is told after a submission.
//!
//! Each outcome kind maps to one fixed presentation here, so call sites never
//! compose their own messages.

use crate::submission::{FailureKind, InputField, SubmissionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    ThumbsUp,
    Pencil,
    Calendar,
    Lock,
    List,
    Warning,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::ThumbsUp => "👍",
            Icon::Pencil => "✎",
            Icon::Calendar => "📅",
            Icon::Lock => "🔒",
            Icon::List => "☰",
            Icon::Warning => "⚠",
        }
    }
}

/// A follow-up the alert offers besides dismissing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Open the system privacy pane for reminders.
    PrivacySettings,
    /// Open this app's settings to pick another list.
    AppSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub title: String,
    pub message: String,
    pub icon: Icon,
    pub tone: Tone,
    pub follow_up: Option<FollowUp>,
}

impl Feedback {
    fn new(title: &str, message: impl Into<String>, icon: Icon, tone: Tone) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            icon,
            tone,
            follow_up: None,
        }
    }

    fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }
}

pub fn for_outcome(outcome: &SubmissionOutcome) -> Feedback {
    match outcome {
        SubmissionOutcome::Success { title, deadline } => Feedback::new(
            "Success!!",
            format!("{}\n({})", title, deadline.format("%Y年%-m月%-d日 %H:%M")),
            Icon::ThumbsUp,
            Tone::Positive,
        ),
        SubmissionOutcome::Failure { kind, .. } => for_failure(*kind),
    }
}

pub fn for_failure(kind: FailureKind) -> Feedback {
    match kind {
        FailureKind::InputInvalid(InputField::Title) => Feedback::new(
            "名前が未入力です",
            "リマインダーの名前を入力してください。",
            Icon::Pencil,
            Tone::Caution,
        ),
        FailureKind::InputInvalid(InputField::Deadline) => Feedback::new(
            "期限が未入力です",
            "「明日の朝9時」のように期限を入力してください。",
            Icon::Pencil,
            Tone::Caution,
        ),
        FailureKind::DateParseFailed => Feedback::new(
            "期限を読み取れません",
            "期限の書き方を変えて、もう一度お試しください。",
            Icon::Calendar,
            Tone::Caution,
        ),
        FailureKind::AccessDenied => Feedback::new(
            "アクセスが許可されていません",
            "設定 > プライバシーとセキュリティ > リマインダー で\nフルアクセスを許可してください。",
            Icon::Lock,
            Tone::Negative,
        )
        .with_follow_up(FollowUp::PrivacySettings),
        FailureKind::NoDefaultList => Feedback::new(
            "デフォルトリストがありません",
            "リマインダーアプリでデフォルトリストを設定してください。",
            Icon::List,
            Tone::Negative,
        ),
        FailureKind::ListNotFound => Feedback::new(
            "作成先リストが見つかりません",
            "設定画面で作成先リストを選び直してください。",
            Icon::List,
            Tone::Caution,
        )
        .with_follow_up(FollowUp::AppSettings),
        FailureKind::DuplicateListId => Feedback::new(
            "作成先リストを特定できません",
            "同じ識別子のリストが複数あります。設定画面で別のリストを選んでください。",
            Icon::List,
            Tone::Negative,
        )
        .with_follow_up(FollowUp::AppSettings),
        FailureKind::CreateFailed | FailureKind::Unexpected => Feedback::new(
            "エラー",
            "予期せぬエラーが発生しました。",
            Icon::Warning,
            Tone::Negative,
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn success_shows_title_and_deadline() {
        let outcome = SubmissionOutcome::Success {
            title: "美容院の予約".to_string(),
            deadline: DateTime::parse_from_rfc3339("2024-03-10T21:00:00+09:00").unwrap(),
        };
        let feedback = for_outcome(&outcome);
        assert_eq!(feedback.message, "美容院の予約\n(2024年3月10日 21:00)");
        assert_eq!(feedback.tone, Tone::Positive);
    }

    #[test]
    fn access_denied_routes_to_privacy_settings() {
        let feedback = for_failure(FailureKind::AccessDenied);
        assert_eq!(feedback.follow_up, Some(FollowUp::PrivacySettings));
    }

    #[test]
    fn stale_list_points_back_to_settings() {
        let feedback = for_failure(FailureKind::ListNotFound);
        assert_eq!(feedback.follow_up, Some(FollowUp::AppSettings));
        assert!(feedback.message.contains("設定画面"));
    }

    #[test]
    fn parse_failure_is_distinct_from_generic_errors() {
        assert_ne!(
            for_failure(FailureKind::DateParseFailed),
            for_failure(FailureKind::Unexpected)
        );
    }
}
