//! Single-key menu: key actions, redraws and terminal attach detection.

mod fixtures;

use embassy_futures::block_on;
use fixtures::{MockDelay, MockLed, MockTransport, io, menu_app, menu_text, run_line, tick};
use pico_cdc_repl::commands::execute_command;
use pico_cdc_repl::{Context, Mode};
use pico_cdc_repl::config::RX_PIPE_SIZE;

fn attached_menu_app() -> fixtures::TestApp<pico_cdc_repl::Menu> {
    let mut app = menu_app();
    tick(&mut app);
    io(&mut app).clear_output();
    app
}

#[test]
fn test_menu_mode() {
    let app = menu_app();
    assert_eq!(app.context().mode(), Mode::Menu);
}

#[test]
fn test_menu_drawn_once_on_attach_before_keys() {
    let mut app = menu_app();
    io(&mut app).connected = false;
    tick(&mut app);
    assert_eq!(app.context().io.output_str(), "");

    {
        let io = io(&mut app);
        io.connected = true;
        io.push_input("1");
    }
    tick(&mut app);

    let expected = format!("{}\r\nHello from the Pico!\r\n{}", menu_text(), menu_text());
    assert_eq!(app.context().io.output_str(), expected);
}

#[test]
fn test_no_redraw_while_attached() {
    let mut app = attached_menu_app();
    tick(&mut app);
    tick(&mut app);
    assert_eq!(app.context().io.output_str(), "");
}

#[test]
fn test_redraw_on_reattach() {
    let mut app = attached_menu_app();

    io(&mut app).connected = false;
    tick(&mut app);
    io(&mut app).connected = true;
    tick(&mut app);

    assert_eq!(app.context().io.output_str(), menu_text());
}

#[test]
fn test_input_discarded_while_detached() {
    let mut app = menu_app();
    {
        let io = io(&mut app);
        io.connected = false;
        io.input.extend(std::iter::repeat_n(b'1', RX_PIPE_SIZE));
    }

    tick(&mut app);

    assert!(app.context().io.input.is_empty());
    assert_eq!(app.context().io.output_str(), "");
    assert!(app.context().led.history.is_empty());
}

#[test]
fn test_attach_after_discarded_input_draws_once() {
    let mut app = menu_app();
    {
        let io = io(&mut app);
        io.connected = false;
        io.input.extend(std::iter::repeat_n(b'2', RX_PIPE_SIZE));
    }
    tick(&mut app);

    io(&mut app).connected = true;
    tick(&mut app);
    tick(&mut app);

    assert_eq!(app.context().io.output_str(), menu_text());
    assert!(app.context().delay.delays_ms.is_empty());
}

#[test]
fn test_greeting() {
    let mut app = attached_menu_app();
    let output = run_line(&mut app, "1");
    assert_eq!(output, format!("\r\nHello from the Pico!\r\n{}", menu_text()));
}

#[test]
fn test_blink_led() {
    let mut app = attached_menu_app();

    let output = run_line(&mut app, "2");

    assert_eq!(output, format!("\r\nLED blinked.\r\n{}", menu_text()));
    assert_eq!(app.context().led.history, vec![true, false]);
    assert_eq!(app.context().delay.delays_ms, vec![200]);
}

#[test]
fn test_reserved_slots() {
    for key in ["3", "4", "5"] {
        let mut app = attached_menu_app();
        let output = run_line(&mut app, key);
        assert_eq!(output, format!("\r\nNot implemented yet.\r\n{}", menu_text()), "{key}");
    }
}

#[test]
fn test_unknown_choice() {
    let mut app = attached_menu_app();
    let output = run_line(&mut app, "x");
    assert_eq!(output, format!("\r\n? unknown choice\r\n{}", menu_text()));
}

#[test]
fn test_whitespace_is_not_a_choice() {
    let mut app = attached_menu_app();
    assert_eq!(run_line(&mut app, "\r\n \t"), "");
    assert!(app.context().io.input.is_empty());
}

#[test]
fn test_pasted_keys_run_in_one_tick() {
    let mut app = attached_menu_app();
    io(&mut app).push_input("13");

    tick(&mut app);

    let expected = format!(
        "\r\nHello from the Pico!\r\n{menu}\r\nNot implemented yet.\r\n{menu}",
        menu = menu_text()
    );
    assert_eq!(app.context().io.output_str(), expected);
    assert!(app.context().io.input.is_empty());
}

#[test]
fn test_menu_never_changes_mode() {
    let mut app = attached_menu_app();
    run_line(&mut app, "12345x\r");
    assert_eq!(app.context().mode(), Mode::Menu);
}

#[test]
fn test_shell_lines_are_silent_in_menu_mode() {
    let mut ctx = Context::new(
        MockTransport::new(),
        MockLed::default(),
        MockDelay::default(),
        Mode::Menu,
    );

    for line in ["bogus", "help", "repl", "mount", ""] {
        block_on(execute_command(&mut ctx, line));
        assert_eq!(ctx.io.output_str(), "", "{line:?}");
        assert_eq!(ctx.mode(), Mode::Menu, "{line:?}");
    }
    assert!(ctx.delay.delays_ms.is_empty());
}
