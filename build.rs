use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录存在，前端未构建时写入占位页面
    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist not found, embedding placeholder page");
        write_placeholder(&dist_path);
    }
}

fn write_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path.join("assets")).expect("Failed to create dist directory");

    let placeholder = r#"<!DOCTYPE html>
<html lang="nl">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%APP_NAME%</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 560px; margin: 96px auto; padding: 0 20px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>%APP_NAME%</h1>
    <p>The back-office frontend has not been built.</p>
    <p><code>cd frontend &amp;&amp; bun install &amp;&amp; bun run build</code></p>
    <p>The API is available under <code>/api/v1</code>.</p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), placeholder)
        .expect("Failed to write placeholder index.html");
}
