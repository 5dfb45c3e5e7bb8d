use colored::Colorize;

use draftly_ai::ChatError;

/// Print the single user-visible notice for a failed turn. Nothing is
/// retried.
pub fn report_error(err: &ChatError) {
    for line in notice_lines(err) {
        eprintln!("{line}");
    }
}

/// The notice policy lives here and nowhere else: rate limiting and
/// payment get their own wording, every other failure shares the one
/// generic notice.
fn notice_lines(err: &ChatError) -> Vec<String> {
    match err {
        ChatError::RateLimited { retry_after_secs } => {
            let mut lines = vec![format!(
                "{} the assistant is receiving too many requests; wait a moment and try again.",
                "Rate limited:".yellow().bold()
            )];
            if let Some(secs) = retry_after_secs {
                lines.push(format!("  the service suggests retrying after {secs}s"));
            }
            lines
        }
        ChatError::PaymentRequired => vec![format!(
            "{} your workspace is out of credits; top up your account to keep chatting.",
            "Payment required:".yellow().bold()
        )],
        other => vec![format!(
            "{} the assistant could not finish its reply: {other}",
            "Error:".red().bold()
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_errors_get_their_own_notice() {
        let lines = notice_lines(&ChatError::RateLimited {
            retry_after_secs: Some(7),
        });
        assert!(lines[0].contains("Rate limited"));
        assert!(lines[1].contains("7s"));

        let lines = notice_lines(&ChatError::PaymentRequired);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Payment required"));
    }

    #[test]
    fn test_everything_else_shares_one_generic_notice() {
        let transport = ChatError::Transport {
            status: 500,
            message: "boom".to_string(),
        };
        let decode = ChatError::Decode("connection reset".to_string());
        for err in [transport, decode] {
            let lines = notice_lines(&err);
            assert_eq!(lines.len(), 1);
            assert!(lines[0].contains("Error:"));
        }
    }
}
