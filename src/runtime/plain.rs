use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::session::{Assistant, SharedSession};

/// What a line of plain-mode input asks for
#[derive(Debug, PartialEq, Eq)]
enum LineCommand<'a> {
    Quit,
    Clear,
    Skip,
    Say(&'a str),
}

fn parse_line(line: &str) -> LineCommand<'_> {
    match line.trim() {
        "" => LineCommand::Skip,
        "/quit" | "/exit" => LineCommand::Quit,
        "/clear" => LineCommand::Clear,
        text => LineCommand::Say(text),
    }
}

/// Line-oriented chat on stdin/stdout
pub async fn run_plain(assistant: Arc<Assistant>, session: SharedSession) -> Result<()> {
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    chat_lines(&assistant, &session, stdin, stdout).await
}

async fn chat_lines<R, W>(
    assistant: &Assistant,
    session: &SharedSession,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output
        .write_all(b"Tell me where and what you'd like to eat. /clear starts over, /quit leaves.\n")
        .await?;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            LineCommand::Quit => break,
            LineCommand::Skip => continue,
            LineCommand::Clear => {
                let message = match session.lock().await.clear() {
                    Ok(()) => "Conversation cleared.".to_string(),
                    Err(e) => e.to_string(),
                };
                output.write_all(format!("{}\n", message).as_bytes()).await?;
            }
            LineCommand::Say(text) => {
                let outcome = assistant.process_shared(session, text).await;
                let reply = if outcome.failed() {
                    outcome.reply.red().to_string()
                } else {
                    outcome.reply
                };
                output.write_all(format!("{}\n", reply).as_bytes()).await?;
            }
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::EntityExtractor;
    use crate::models::{CompletionResponse, MockCompletionClient, SamplingParams};
    use crate::session::Session;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  /quit "), LineCommand::Quit);
        assert_eq!(parse_line("/clear"), LineCommand::Clear);
        assert_eq!(parse_line("   "), LineCommand::Skip);
        assert_eq!(parse_line(" thai please "), LineCommand::Say("thai please"));
    }

    #[tokio::test]
    async fn test_chat_lines_runs_turns_and_clears() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().times(1).returning(|_, _| {
            Ok(CompletionResponse {
                content: "Thai in Austin, got it.".to_string(),
                usage: None,
                model_name: "mock".to_string(),
            })
        });
        let assistant = Assistant::new(
            Arc::new(mock),
            EntityExtractor::default(),
            SamplingParams::default(),
        );
        let session = Session::new().shared();

        let input = BufReader::new(&b"thai in Austin\n\n/clear\n/quit\nignored\n"[..]);
        let mut output = Vec::new();
        chat_lines(&assistant, &session, input, &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Thai in Austin, got it."));
        assert!(text.contains("Conversation cleared."));
        assert!(session.lock().await.transcript().is_empty());
    }
}
