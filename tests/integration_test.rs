use std::io::Write;
use tempfile::NamedTempFile;

// 导入应用模块
use s3_relay::cli::run;

/// 写入临时配置文件
fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// 运行命令行，返回退出码、标准输出和标准错误
async fn run_cli(args: &[&str]) -> (u8, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut argv = vec!["s3-relay"];
    argv.extend_from_slice(args);

    let code = run(argv, &mut stdout, &mut stderr).await;
    (
        code,
        String::from_utf8(stdout).unwrap(),
        String::from_utf8(stderr).unwrap(),
    )
}

/// 集成测试：缺少路径参数
///
/// presign-get 与 presign-put 缺少路径时应以 1 退出，并在标准错误输出用法
#[tokio::test]
async fn test_missing_path_is_usage_error() {
    for command in ["presign-get", "presign-put"] {
        let (code, stdout, stderr) = run_cli(&[command]).await;
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(stderr.contains("Usage:"));
        assert!(stderr.contains(command));
    }
}

/// 集成测试：未配置存储桶
///
/// presign-put 应以 2 退出，且不输出任何 URL
#[tokio::test]
async fn test_presign_put_without_bucket() {
    let config = config_file("REGION=\"us-east-1\"\nPREFIX=\"uploads\"\n");
    let path = config.path().to_str().unwrap();

    let (code, stdout, stderr) = run_cli(&["--config", path, "presign-put", "a/b.txt"]).await;

    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("BUCKET"));
}

/// 集成测试：未配置区域
#[tokio::test]
async fn test_presign_get_without_region() {
    let config = config_file("BUCKET=\"relay-bucket\"\n");
    let path = config.path().to_str().unwrap();

    let (code, stdout, _) = run_cli(&["--config", path, "presign-get", "a/b.txt"]).await;

    assert_eq!(code, 3);
    assert!(stdout.is_empty());
}

/// 集成测试：presign-put 未配置区域
#[tokio::test]
async fn test_presign_put_without_region() {
    let config = config_file("BUCKET=\"relay-bucket\"\nPREFIX=\"uploads\"\n");
    let path = config.path().to_str().unwrap();

    let (code, stdout, stderr) = run_cli(&["--config", path, "presign-put", "a/b.txt"]).await;

    assert_eq!(code, 3);
    assert!(stdout.is_empty());
    assert!(stderr.contains("REGION"));
}

/// 集成测试：缺少路径优先于配置错误
#[tokio::test]
async fn test_usage_error_before_config() {
    let config = config_file("");
    let path = config.path().to_str().unwrap();

    let (code, _, _) = run_cli(&["--config", path, "presign-put"]).await;
    assert_eq!(code, 1);
}

/// 集成测试：sync 同样校验必填配置
#[tokio::test]
async fn test_sync_without_bucket() {
    let config = config_file("REGION=\"us-east-1\"\n");
    let path = config.path().to_str().unwrap();

    let (code, _, _) = run_cli(&["sync", "--config", path]).await;
    assert_eq!(code, 2);
}

/// 集成测试：配置文件不存在
#[tokio::test]
async fn test_unreadable_config() {
    let (code, stdout, stderr) = run_cli(&[
        "--config",
        "/nonexistent/s3-relay.conf",
        "presign-get",
        "a.txt",
    ])
    .await;

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("/nonexistent/s3-relay.conf"));
}

/// 集成测试：无效的过期时间
#[tokio::test]
async fn test_invalid_expiry_argument() {
    let (code, stdout, _) = run_cli(&["presign-get", "a.txt", "tomorrow"]).await;
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
}

/// 集成测试：帮助信息输出到标准输出
#[tokio::test]
async fn test_help() {
    let (code, stdout, stderr) = run_cli(&["--help"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("presign-get"));
    assert!(stdout.contains("presign-put"));
    assert!(stdout.contains("sync"));
    assert!(stderr.is_empty());
}
