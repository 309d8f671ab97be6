//! Session integration tests
//!
//! Covers the chat loop, the interrupt handler and the confirmation prompt
//! against a scripted terminal.

mod common;

use common::*;
use serde_json::json;

use teams_agent_core::agent::{Decision, Interrupt, InterruptValue, RunnableConfig};
use teams_agent_core::session::{
    confirm, handle_interrupt, stream_agent, ChatLoop, LineStyle, ASSISTANT_PREFIX, FAREWELL_BANNER, INPUT_PROMPT,
    STATUS_PREFIX, WELCOME_BANNER,
};
use teams_agent_core::AgentInput;

mod confirm_tests {
    use super::*;

    #[test]
    fn test_yes_answers() {
        for answer in ["y", "Y", "yes", "YES"] {
            let mut terminal = ScriptedTerminal::new(&[answer]);
            assert!(confirm("Continue?", &mut terminal).unwrap(), "{:?}", answer);
        }
    }

    #[test]
    fn test_no_answers() {
        for answer in ["", "n", "no", "maybe"] {
            let mut terminal = ScriptedTerminal::new(&[answer]);
            assert!(!confirm("Continue?", &mut terminal).unwrap(), "{:?}", answer);
        }
    }

    #[test]
    fn test_question_suffix() {
        let mut terminal = ScriptedTerminal::new(&["n"]);
        confirm("Do you approve this tool call?", &mut terminal).unwrap();
        assert_eq!(terminal.prompts(), vec!["Do you approve this tool call? (y/n) "]);
    }
}

mod interrupt_handler_tests {
    use super::*;

    fn authorization_interrupt(id: Option<&str>) -> Interrupt {
        let mut response = pending_authorization("auth_1");
        response.id = id.map(String::from);
        Interrupt::new(InterruptValue::Authorization {
            tool_name: "MicrosoftTeams_ListChats".to_string(),
            authorization_response: response,
        })
    }

    fn approval_interrupt() -> Interrupt {
        Interrupt::new(InterruptValue::Approval {
            tool_name: "MicrosoftTeams_SendMessageToChat".to_string(),
            input: json!({ "chat_id": "c1", "message": "hello" }),
        })
    }

    #[tokio::test]
    async fn test_authorization_granted() {
        let mut terminal = ScriptedTerminal::new(&[]);
        let waiter = FakeWaiter::succeeding();

        let decision = handle_interrupt(&authorization_interrupt(Some("auth_1")), &mut terminal, &waiter).await;

        assert_eq!(decision, Decision::approve());
        assert_eq!(*waiter.waited.lock(), vec!["auth_1"]);
        let status = terminal.lines(LineStyle::Status);
        assert_eq!(
            status[0],
            format!("{}Authorization required for tool call MicrosoftTeams_ListChats", STATUS_PREFIX)
        );
        assert_eq!(
            status[1],
            format!("{}Please authorize in your browser https://auth.example.com/auth_1", STATUS_PREFIX)
        );
        assert!(status.iter().any(|l| l.contains("Authorization granted")));
        assert!(terminal.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_authorization_wait_failure() {
        let mut terminal = ScriptedTerminal::new(&[]);
        let waiter = FakeWaiter::failing();

        let decision = handle_interrupt(&authorization_interrupt(Some("auth_1")), &mut terminal, &waiter).await;

        assert_eq!(decision, Decision::deny());
        assert_eq!(terminal.lines(LineStyle::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_authorization_without_id() {
        let mut terminal = ScriptedTerminal::new(&[]);
        let waiter = FakeWaiter::succeeding();

        let decision = handle_interrupt(&authorization_interrupt(None), &mut terminal, &waiter).await;

        assert_eq!(decision, Decision::deny());
        assert!(waiter.waited.lock().is_empty());
    }

    #[tokio::test]
    async fn test_approval_yes() {
        let mut terminal = ScriptedTerminal::new(&["yes"]);
        let decision = handle_interrupt(&approval_interrupt(), &mut terminal, &FakeWaiter::succeeding()).await;

        assert_eq!(decision, Decision::approve());
        let status = terminal.lines(LineStyle::Status);
        assert!(status[0].contains("Human in the loop required for tool call MicrosoftTeams_SendMessageToChat"));
        assert!(status[1].contains(r#""chat_id":"c1""#));
        assert_eq!(terminal.prompts(), vec!["Do you approve this tool call? (y/n) "]);
    }

    #[tokio::test]
    async fn test_approval_no() {
        let mut terminal = ScriptedTerminal::new(&["no"]);
        let decision = handle_interrupt(&approval_interrupt(), &mut terminal, &FakeWaiter::succeeding()).await;
        assert_eq!(decision, Decision::deny());
    }

    #[tokio::test]
    async fn test_unknown_interrupt_declined_without_prompt() {
        let mut terminal = ScriptedTerminal::new(&["yes"]);
        let waiter = FakeWaiter::succeeding();
        let interrupt = Interrupt::new(InterruptValue::from_payload(json!({ "something": "else" })));

        let decision = handle_interrupt(&interrupt, &mut terminal, &waiter).await;

        assert_eq!(decision, Decision::deny());
        assert!(terminal.prompts().is_empty());
        assert!(waiter.waited.lock().is_empty());
        assert_eq!(terminal.lines(LineStyle::Status).len(), 1);
    }
}

mod turn_tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_agent_prints_messages() {
        let model = ScriptedModel::new(vec![reply("Hello from Teams.")]);
        let agent = build_agent(model, FakeExecutor::new(), vec![]);
        let mut terminal = ScriptedTerminal::new(&[]);

        let interrupts = stream_agent(&agent, AgentInput::user("hi"), &RunnableConfig::new("1"), &mut terminal)
            .await
            .unwrap();

        assert!(interrupts.is_empty());
        let printed = terminal.lines(LineStyle::Assistant);
        assert_eq!(printed.len(), 1);
        assert!(printed[0].starts_with(ASSISTANT_PREFIX));
        assert!(printed[0].ends_with("Hello from Teams."));
    }

    #[tokio::test]
    async fn test_stream_agent_returns_interrupts_in_order() {
        let model = ScriptedModel::new(vec![calls(vec![
            tool_call("call_1", "MicrosoftTeams_SendMessageToChat", json!({})),
            tool_call("call_2", "MicrosoftTeams_ReplyToChatMessage", json!({})),
        ])]);
        let agent = build_agent(
            model,
            FakeExecutor::new(),
            vec![teams_tool("SendMessageToChat", false), teams_tool("ReplyToChatMessage", false)],
        );
        let mut terminal = ScriptedTerminal::new(&[]);

        let interrupts = stream_agent(&agent, AgentInput::user("go"), &RunnableConfig::new("1"), &mut terminal)
            .await
            .unwrap();

        let names: Vec<_> = interrupts.iter().filter_map(|i| i.value.tool_name()).collect();
        assert_eq!(names, vec!["MicrosoftTeams_SendMessageToChat", "MicrosoftTeams_ReplyToChatMessage"]);
        // Only the model update is printed
        assert_eq!(terminal.lines(LineStyle::Assistant).len(), 1);
    }
}

mod chat_loop_tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_starts_no_turn() {
        for exit in ["exit", "EXIT", "Exit"] {
            let model = ScriptedModel::new(vec![reply("unused")]);
            let agent = build_agent(model.clone(), FakeExecutor::new(), vec![]);
            let waiter = FakeWaiter::succeeding();
            let mut terminal = ScriptedTerminal::new(&[exit, "hello"]);

            ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
                .run(&mut terminal)
                .await
                .unwrap();

            assert_eq!(model.calls_made(), 0);
            assert_eq!(terminal.prompts(), vec![INPUT_PROMPT]);
            assert_eq!(terminal.lines(LineStyle::Welcome), vec![WELCOME_BANNER]);
            assert_eq!(terminal.lines(LineStyle::Farewell), vec![FAREWELL_BANNER]);
        }
    }

    #[tokio::test]
    async fn test_end_of_input_terminates() {
        let model = ScriptedModel::new(vec![]);
        let agent = build_agent(model.clone(), FakeExecutor::new(), vec![]);
        let waiter = FakeWaiter::succeeding();
        let mut terminal = ScriptedTerminal::new(&[]);

        ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(model.calls_made(), 0);
        assert_eq!(terminal.lines(LineStyle::Farewell), vec![FAREWELL_BANNER]);
    }

    #[tokio::test]
    async fn test_pause_spans_whole_turn() {
        let model = ScriptedModel::new(vec![
            calls(vec![tool_call("call_1", "MicrosoftTeams_SendMessageToChat", json!({ "message": "hi" }))]),
            reply("Sent."),
        ]);
        let executor = FakeExecutor::new();
        let agent = build_agent(model.clone(), executor.clone(), vec![teams_tool("SendMessageToChat", false)]);
        let waiter = FakeWaiter::succeeding();
        let mut terminal = ScriptedTerminal::new(&["send hi to the team", "y", "exit"]);

        ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(executor.executed_tools(), vec!["MicrosoftTeams.SendMessageToChat"]);
        assert_eq!(model.calls_made(), 2);

        let pause = terminal.events.iter().position(|e| *e == TerminalEvent::Pause).unwrap();
        let resume = terminal.events.iter().position(|e| *e == TerminalEvent::Resume).unwrap();
        let question = terminal
            .events
            .iter()
            .position(|e| matches!(e, TerminalEvent::Read(p) if p.starts_with("Do you approve")))
            .unwrap();
        let final_answer = terminal
            .events
            .iter()
            .position(|e| matches!(e, TerminalEvent::Write(LineStyle::Assistant, text) if text.ends_with("Sent.")))
            .unwrap();
        assert!(pause < question && question < final_answer && final_answer < resume);
        assert!(!terminal.is_paused());
    }

    #[tokio::test]
    async fn test_many_interrupts_resolved_in_order() {
        let model = ScriptedModel::new(vec![
            calls(vec![
                tool_call("call_1", "MicrosoftTeams_CreateChat", json!({})),
                tool_call("call_2", "MicrosoftTeams_SendMessageToChat", json!({})),
            ]),
            reply("Created the chat only."),
        ]);
        let executor = FakeExecutor::new();
        let agent = build_agent(
            model,
            executor.clone(),
            vec![teams_tool("CreateChat", false), teams_tool("SendMessageToChat", false)],
        );
        let waiter = FakeWaiter::succeeding();
        let mut terminal = ScriptedTerminal::new(&["set it up", "yes", "no", "exit"]);

        ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(executor.executed_tools(), vec!["MicrosoftTeams.CreateChat"]);
        assert!(terminal.lines(LineStyle::Error).is_empty());
    }

    #[tokio::test]
    async fn test_authorization_cycle() {
        let model = ScriptedModel::new(vec![
            calls(vec![tool_call("call_1", "MicrosoftTeams_ListChats", json!({}))]),
            reply("Here are your chats."),
        ]);
        let executor = FakeExecutor::new();
        executor.pending_auth("MicrosoftTeams.ListChats", "auth_42");
        let agent = build_agent(model, executor.clone(), vec![teams_tool("ListChats", true)]);
        let waiter = FakeWaiter::succeeding();
        let mut terminal = ScriptedTerminal::new(&["list my chats", "exit"]);

        ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(*waiter.waited.lock(), vec!["auth_42"]);
        assert_eq!(executor.executed_tools(), vec!["MicrosoftTeams.ListChats"]);
        assert_eq!(terminal.prompts(), vec![INPUT_PROMPT, INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_turn_error_is_reported_and_loop_continues() {
        let model = ScriptedModel::new(vec![]);
        let agent = build_agent(model.clone(), FakeExecutor::new(), vec![]);
        let waiter = FakeWaiter::succeeding();
        let mut terminal = ScriptedTerminal::new(&["first", "second", "exit"]);

        ChatLoop::new(&agent, &waiter, RunnableConfig::new("1"))
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(model.calls_made(), 2);
        assert_eq!(terminal.lines(LineStyle::Error).len(), 2);
        assert_eq!(terminal.lines(LineStyle::Farewell), vec![FAREWELL_BANNER]);
        let pauses = terminal.events.iter().filter(|e| **e == TerminalEvent::Pause).count();
        let resumes = terminal.events.iter().filter(|e| **e == TerminalEvent::Resume).count();
        assert_eq!((pauses, resumes), (2, 2));
    }
}
