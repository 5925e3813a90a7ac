//! Runs the real `weather` binary and interrupts its console.
#![cfg(unix)]

use std::{
    io::Read,
    process::{Command, Stdio},
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

#[test]
fn sigint_ends_console_while_stdin_stays_open() {
    let home = std::env::temp_dir().join("weather-cli-interrupt-test");
    let mut child = Command::new(env!("CARGO_BIN_EXE_weather"))
        .args(["--fake", "console"])
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("PROVIDER_NAME")
        .env_remove("WEATHER_CACHE_TTL")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    // Hold stdin open so the console is blocked in a read when the signal lands.
    let _stdin = child.stdin.take().unwrap();

    let mut stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    thread::spawn(move || {
        let mut buf = [0u8; 256];
        while let Ok(n) = stdout.read(&mut buf) {
            if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
                break;
            }
        }
    });

    let mut output = String::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while !output.contains("Enter a city") {
        let chunk = rx.recv_timeout(deadline.saturating_duration_since(Instant::now())).unwrap();
        output.push_str(&String::from_utf8_lossy(&chunk));
    }
    // Let the console reach its select before signalling.
    thread::sleep(Duration::from_millis(300));

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("console still running 5s after SIGINT; output so far: {output:?}");
        }
        thread::sleep(Duration::from_millis(50));
    };

    while let Ok(chunk) = rx.recv_timeout(Duration::from_secs(1)) {
        output.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(exit.success(), "exit status: {exit}");
    assert!(output.ends_with("Interrupted by user.\n"), "output: {output:?}");
}
