//! Integration tests against a real Chromium browser.
//!
//! Requires Chrome/Chromium to be installed and accessible. Run with:
//! ```bash
//! export AUSPEX_USE_REAL_CHROME=1
//! cargo test -p auspex-cdp-adapter --test integration_tests -- --nocapture
//! ```

use std::env;
use std::time::Duration;

use auspex_cdp_adapter::{ChromeDriver, LaunchConfig};
use serial_test::serial;

fn should_run_real_tests() -> bool {
    env::var("AUSPEX_USE_REAL_CHROME")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn test_launch_config() -> LaunchConfig {
    let mut cfg = LaunchConfig { headless: true, ..Default::default() };
    if let Ok(chrome_path) = env::var("AUSPEX_CHROME") {
        cfg.executable = Some(chrome_path.into());
    }
    cfg
}

#[tokio::test]
#[serial]
async fn test_browser_launch_and_new_page() {
    if !should_run_real_tests() {
        println!("Skipping real browser test (AUSPEX_USE_REAL_CHROME not set)");
        return;
    }

    let driver = ChromeDriver::launch(test_launch_config())
        .await
        .expect("launch chromium");
    assert!(!driver.is_disconnected());

    let _page = driver.new_page().await.expect("create page");
    driver.close().await.expect("close chromium");
}

#[tokio::test]
#[serial]
async fn test_navigate_and_read_url() {
    if !should_run_real_tests() {
        println!("Skipping real browser test (AUSPEX_USE_REAL_CHROME not set)");
        return;
    }

    let driver = ChromeDriver::launch(test_launch_config())
        .await
        .expect("launch chromium");
    let page = driver.new_page().await.expect("create page");

    page.goto("https://example.com", Duration::from_secs(15))
        .await
        .expect("navigate succeeds");

    let url = page.url().await.expect("url succeeds");
    assert!(url.contains("example.com"));

    driver.close().await.expect("close chromium");
}

#[tokio::test]
#[serial]
async fn test_click_and_select_errors_on_missing_element() {
    if !should_run_real_tests() {
        println!("Skipping real browser test (AUSPEX_USE_REAL_CHROME not set)");
        return;
    }

    let driver = ChromeDriver::launch(test_launch_config())
        .await
        .expect("launch chromium");
    let page = driver.new_page().await.expect("create page");

    page.goto("https://example.com", Duration::from_secs(15))
        .await
        .expect("navigate succeeds");

    let result = page.click("#nonexistent-element", Duration::from_secs(2)).await;
    assert!(result.is_err());

    driver.close().await.expect("close chromium");
}

#[tokio::test]
#[serial]
async fn test_screenshot_capture() {
    if !should_run_real_tests() {
        println!("Skipping real browser test (AUSPEX_USE_REAL_CHROME not set)");
        return;
    }

    let driver = ChromeDriver::launch(test_launch_config())
        .await
        .expect("launch chromium");
    let page = driver.new_page().await.expect("create page");

    page.goto("https://example.com", Duration::from_secs(15))
        .await
        .expect("navigate succeeds");

    let jpeg = page.screenshot(75).await.expect("screenshot succeeds");
    assert!(!jpeg.is_empty());

    driver.close().await.expect("close chromium");
}

#[tokio::test]
#[serial]
async fn test_concurrent_pages() {
    if !should_run_real_tests() {
        println!("Skipping real browser test (AUSPEX_USE_REAL_CHROME not set)");
        return;
    }

    let driver = ChromeDriver::launch(test_launch_config())
        .await
        .expect("launch chromium");

    let mut handles = Vec::new();
    for _ in 0..3 {
        let page = driver.new_page().await.expect("create page");
        handles.push(tokio::spawn(async move {
            page.goto("https://example.com", Duration::from_secs(15)).await
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked").expect("navigation succeeds");
    }

    driver.close().await.expect("close chromium");
}
