use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[test]
fn exits_with_error_when_api_key_is_missing() {
    // an empty value counts as unset and is not overridden by any .env file
    let mut child = Command::new(env!("CARGO_BIN_EXE_chat-proxy"))
        .current_dir(std::env::temp_dir())
        .env("OPENAI_API_KEY", "")
        .env("PORT", "0")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("server kept running without an API key");
        }
        std::thread::sleep(Duration::from_millis(20));
    };

    assert!(!status.success());
    assert_eq!(status.code(), Some(1));
}
