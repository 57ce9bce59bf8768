use anyhow::Result;
use console::style;

use vane::agent::Agent;
use vane::models::message::Message;

use crate::prompt::{InputType, Prompt};

/// Whether the input is the exit command rather than a message for the model
pub fn is_exit_command(text: &str) -> bool {
    text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit")
}

pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
    messages: Vec<Message>,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            agent,
            prompt,
            messages: Vec::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            let input = self.prompt.get_input()?;
            let text = match input.input_type {
                InputType::Exit => break,
                InputType::AskAgain => continue,
                InputType::Message => match input.content {
                    Some(text) => text,
                    None => continue,
                },
            };

            // Checked before the user message is sent anywhere.
            if is_exit_command(&text) {
                break;
            }

            self.messages.push(Message::user().with_text(&text));

            self.prompt.show_busy();
            let reply = self.agent.reply(&self.messages).await;
            self.prompt.hide_busy();

            match reply {
                Ok(new_messages) => {
                    for message in new_messages {
                        self.prompt.render(&message);
                        self.messages.push(message);
                    }
                }
                // A failed turn is reported and the loop goes back to input.
                Err(e) => eprintln!("{}", style(format!("[System Error]: {}", e)).red()),
            }
        }

        self.prompt.close();
        Ok(())
    }

    #[cfg(test)]
    fn transcript(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Input;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use vane::models::role::Role;
    use vane::models::tool::Tool;
    use vane::providers::base::{Provider, Usage};
    use vane::toolset::WeatherToolset;
    use vane::weather::{WeatherClient, WeatherConfig};

    /// Provider double that counts calls and errors once its script runs dry
    struct CountingProvider {
        responses: Arc<Mutex<VecDeque<Message>>>,
        calls: Arc<Mutex<usize>>,
    }

    impl CountingProvider {
        fn new(responses: Vec<Message>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        fn call_counter(&self) -> Arc<Mutex<usize>> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl Provider for CountingProvider {
        async fn complete(
            &self,
            _system: &str,
            _messages: &[Message],
            _tools: &[Tool],
        ) -> Result<(Message, Usage)> {
            *self.calls.lock().unwrap() += 1;
            match self.responses.lock().unwrap().pop_front() {
                Some(message) => Ok((message, Usage::default())),
                None => Err(anyhow!("no scripted response left")),
            }
        }
    }

    /// Prompt double fed a fixed input script; exits when the script ends
    struct ScriptedPrompt {
        inputs: VecDeque<String>,
        rendered: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedPrompt {
        fn new(inputs: Vec<&str>) -> Self {
            Self {
                inputs: inputs.into_iter().map(String::from).collect(),
                rendered: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn rendered(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.rendered)
        }
    }

    impl Prompt for ScriptedPrompt {
        fn render(&mut self, message: &Message) {
            self.rendered.lock().unwrap().push(message.text());
        }

        fn get_input(&mut self) -> Result<Input> {
            match self.inputs.pop_front() {
                Some(text) => Ok(Input {
                    input_type: InputType::Message,
                    content: Some(text),
                }),
                None => Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                }),
            }
        }

        fn show_busy(&mut self) {}
        fn hide_busy(&self) {}
        fn close(&self) {}
    }

    fn offline_agent(provider: CountingProvider) -> Agent {
        let config = WeatherConfig::new("http://127.0.0.1:1".to_string(), "test_key".to_string());
        let weather = WeatherClient::new(config).unwrap();
        Agent::new(Box::new(provider), Box::new(WeatherToolset::new(weather)))
    }

    #[test]
    fn test_is_exit_command() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("Exit"));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("exit please"));
        assert!(!is_exit_command("quite"));
    }

    #[tokio::test]
    async fn test_exit_input_makes_no_network_call() -> Result<()> {
        let provider = CountingProvider::new(vec![]);
        let calls = provider.call_counter();
        let agent = offline_agent(provider);

        let mut session = Session::new(agent, Box::new(ScriptedPrompt::new(vec!["QUIT"])));
        session.start().await?;

        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(session.transcript().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_message_turn_grows_transcript() -> Result<()> {
        let provider = CountingProvider::new(vec![Message::assistant().with_text("Hello!")]);
        let calls = provider.call_counter();
        let prompt = ScriptedPrompt::new(vec!["Hi there"]);
        let rendered = prompt.rendered();
        let agent = offline_agent(provider);

        let mut session = Session::new(agent, Box::new(prompt));
        session.start().await?;

        assert_eq!(*calls.lock().unwrap(), 1);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].text(), "Hi there");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].text(), "Hello!");

        assert_eq!(rendered.lock().unwrap().as_slice(), ["Hello!"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_transcript_and_loop_alive() -> Result<()> {
        // First turn errors (empty script), second turn succeeds.
        let provider = CountingProvider::new(vec![]);
        let calls = provider.call_counter();
        let agent = offline_agent(provider);

        let mut session = Session::new(
            agent,
            Box::new(ScriptedPrompt::new(vec!["first", "second"])),
        );
        session.start().await?;

        // Both turns reached the provider; both user messages survive.
        assert_eq!(*calls.lock().unwrap(), 2);
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript.iter().all(|m| m.role == Role::User));
        Ok(())
    }
}
