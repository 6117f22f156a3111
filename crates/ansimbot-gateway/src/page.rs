//! Built-in chat test page served at `/`.

/// Minimal single-file page that posts to `/chat` and renders the token
/// stream incrementally. Enough to exercise the server without a separate
/// frontend.
pub fn chat_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>안심 거래 문의 챗봇</title>
<style>
  body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
  #log { border: 1px solid #ccc; border-radius: 8px; padding: 1rem; min-height: 240px; white-space: pre-wrap; }
  .user { color: #1a56a0; margin-top: .75rem; }
  .bot { color: #222; }
  form { display: flex; gap: .5rem; margin-top: 1rem; }
  input { flex: 1; padding: .5rem; }
</style>
</head>
<body>
<h1>안심 거래 및 이상거래 탐지 문의</h1>
<div id="log"></div>
<form id="f">
  <input id="m" placeholder="예: 이상거래 신고는 어떻게 접수하나요?" autocomplete="off">
  <button>보내기</button>
</form>
<script>
const log = document.getElementById("log");
document.getElementById("f").addEventListener("submit", async (e) => {
  e.preventDefault();
  const input = document.getElementById("m");
  const message = input.value.trim();
  if (!message) return;
  input.value = "";
  append("user", "Q: " + message);
  const span = append("bot", "");
  const resp = await fetch("/chat", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ message }),
  });
  if (!resp.ok) {
    const err = await resp.json().catch(() => ({}));
    span.textContent = err.error || "요청 실패";
    return;
  }
  const reader = resp.body.getReader();
  const decoder = new TextDecoder();
  for (;;) {
    const { done, value } = await reader.read();
    if (done) break;
    span.textContent += decoder.decode(value, { stream: true });
  }
});
function append(cls, text) {
  const div = document.createElement("div");
  div.className = cls;
  div.textContent = text;
  log.appendChild(div);
  return div;
}
</script>
</body>
</html>
"#
}
