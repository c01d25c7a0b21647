//! The demo page
//!
//! One server-rendered HTML page declaring the whole widget tree: sample
//! quick-picks, upload, URL box, option checkboxes, the analyze button, the
//! report panel, and three audio players. The page talks to the JSON API
//! with plain `fetch`.

use crate::server::AppState;

/// Render the demo page for the current state
pub fn render(state: &AppState) -> String {
    let samples_html = if state.samples.is_empty() {
        format!(
            "<p class=\"hint\">No audio samples found. Add files to <code>{}</code></p>",
            escape(&state.settings.samples_dir.display().to_string())
        )
    } else {
        state
            .samples
            .iter()
            .map(|s| {
                format!(
                    "<button class=\"sample\" data-path=\"{}\" data-url=\"/files/samples/{}\">🎵 {}</button>",
                    escape(&s.path.display().to_string()),
                    escape(
                        &s.path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default()
                    ),
                    escape(&s.name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let options_html = state
        .analyzer
        .option_labels()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let checked = if i == 0 { " checked" } else { "" };
            format!(
                "<label><input type=\"checkbox\" class=\"opt\" value=\"{0}\"{1}> {0}</label>",
                escape(label),
                checked
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Audio Analysis Demo</title>
<style>
  body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #222; }}
  h1 {{ font-size: 1.6rem; }}
  h2 {{ font-size: 1.1rem; margin-top: 1.6rem; }}
  button {{ padding: 0.4rem 0.9rem; border-radius: 6px; border: 1px solid #bbb; background: #f6f6f6; cursor: pointer; }}
  button.primary {{ background: #2563eb; color: #fff; border: none; font-size: 1rem; padding: 0.6rem 1.4rem; }}
  .sample {{ margin: 0.15rem; }}
  .row {{ display: flex; gap: 1rem; flex-wrap: wrap; align-items: flex-start; }}
  input[type="text"] {{ width: 100%; padding: 0.4rem; }}
  #report {{ background: #fafafa; border: 1px solid #e2e2e2; border-radius: 6px; padding: 1rem; white-space: pre-wrap; min-height: 4rem; }}
  .hint {{ color: #777; }}
  audio {{ width: 100%; }}
  .player {{ flex: 1; min-width: 240px; }}
</style>
</head>
<body>
<h1>🎵 Audio Analysis Demo</h1>
<p class="hint">Upload a file, pick a sample, or paste a YouTube URL, then analyze.</p>

<h2>🎵 Sample Audio (Click to Load)</h2>
<div id="samples">
{samples_html}
</div>

<h2>🎯 Input Audio</h2>
<div class="row">
  <div class="player">
    <input type="file" id="upload" accept="audio/*">
    <audio id="input-player" controls></audio>
    <p class="hint" id="current-file">No file selected</p>
  </div>
  <div class="player">
    <input type="text" id="yt-url" placeholder="https://youtube.com/watch?v=...">
    <label>Format
      <select id="yt-format"><option>wav</option><option>mp3</option></select>
    </label>
    <label>Quality (MP3)
      <select id="yt-quality"><option>320</option><option>192</option><option selected>128</option><option>96</option></select>
    </label>
    <button id="yt-download">📥 Download from YouTube</button>
  </div>
</div>

<h2>⚙️ Analysis Options</h2>
<div id="options">
{options_html}
</div>

<p><button id="analyze" class="primary">🔬 Analyze Audio</button></p>

<h2>📊 Results</h2>
<div id="report"></div>

<h2>🎧 Audio Outputs</h2>
<div class="row">
  <div class="player"><p>Beats + Downbeats</p><audio id="out-0" controls></audio></div>
  <div class="player"><p>Onsets</p><audio id="out-1" controls></audio></div>
  <div class="player"><p>Additional Output</p><audio id="out-2" controls></audio></div>
</div>

<details>
<summary>❓ Help</summary>
<ul>
  <li>Click a sample button, upload an audio file (MP3, WAV, FLAC, OGG, M4A, AAC), or paste a YouTube URL and download it.</li>
  <li>Pick the analyses to run, then press Analyze. Results appear above, with click tracks you can play to verify detections by ear.</li>
  <li>YouTube downloads need <code>yt-dlp</code> installed on the server.</li>
  <li>Downloaded and generated files are cleaned up automatically after a few days.</li>
</ul>
</details>

<script>
let currentPath = null;

function setCurrent(path, url) {{
  currentPath = path;
  document.getElementById('current-file').textContent = path || 'No file selected';
  const player = document.getElementById('input-player');
  if (url) {{ player.src = url; }}
}}

document.querySelectorAll('.sample').forEach(btn => {{
  btn.addEventListener('click', () => setCurrent(btn.dataset.path, btn.dataset.url));
}});

document.getElementById('upload').addEventListener('change', async (e) => {{
  const file = e.target.files[0];
  if (!file) return;
  const form = new FormData();
  form.append('file', file);
  const res = await fetch('/api/upload', {{ method: 'POST', body: form }});
  const data = await res.json();
  if (data.path) {{
    setCurrent(data.path, URL.createObjectURL(file));
  }} else {{
    document.getElementById('report').textContent = data.error || 'Upload failed';
  }}
}});

document.getElementById('yt-download').addEventListener('click', async () => {{
  const body = {{
    url: document.getElementById('yt-url').value,
    format: document.getElementById('yt-format').value,
    quality: document.getElementById('yt-quality').value,
  }};
  document.getElementById('report').textContent = 'Downloading...';
  const res = await fetch('/api/download', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify(body),
  }});
  const data = await res.json();
  document.getElementById('report').textContent = data.report;
  if (data.path) setCurrent(data.path, null);
}});

document.getElementById('analyze').addEventListener('click', async () => {{
  const options = Array.from(document.querySelectorAll('.opt:checked')).map(o => o.value);
  document.getElementById('report').textContent = 'Analyzing...';
  const res = await fetch('/api/analyze', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ path: currentPath, options }}),
  }});
  const data = await res.json();
  document.getElementById('report').textContent = data.report;
  data.artifacts.forEach((url, i) => {{
    const player = document.getElementById('out-' + i);
    if (url) {{ player.src = url; }} else {{ player.removeAttribute('src'); }}
  }});
}});
</script>
</body>
</html>
"#
    )
}

/// Minimal HTML escaping for attribute and text positions
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
