use axum::response::Html;

/// 看板页面直接内嵌进二进制，部署时只有一个可执行文件
const DASHBOARD_HTML: &str = include_str!("../../../assets/dashboard.html");

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
