//! HTML rendering for the upload form, result and error pages

use axum::http::StatusCode;

use crate::color::NitriteMode;
use crate::config::Language;
use crate::storage::StoredFile;
use crate::UrineAnalysis;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
img{max-width:100%;border:1px solid #ccc}\
.swatch{display:inline-block;width:1.5rem;height:1.5rem;border:1px solid #444;vertical-align:middle}\
.note{color:#666;font-size:.85rem}";

const CAMERA_JS: &str = r#"(function(){
  const video = document.getElementById('camera');
  const canvas = document.getElementById('snapshot');
  const field = document.getElementById('camera_image');
  const form = document.getElementById('upload-form');
  document.getElementById('start-camera').onclick = async () => {
    const stream = await navigator.mediaDevices.getUserMedia({ video: { facingMode: 'environment' } });
    video.srcObject = stream;
    video.style.display = 'block';
    document.getElementById('capture').disabled = false;
  };
  document.getElementById('capture').onclick = () => {
    canvas.width = video.videoWidth;
    canvas.height = video.videoHeight;
    canvas.getContext('2d').drawImage(video, 0, 0);
    field.value = canvas.toDataURL('image/png');
    form.submit();
  };
})();"#;

struct Text {
    title: &'static str,
    choose_file: &'static str,
    background: &'static str,
    yellow: &'static str,
    white: &'static str,
    analyze: &'static str,
    start_camera: &'static str,
    capture: &'static str,
    result: &'static str,
    color: &'static str,
    mean: &'static str,
    nitrite: &'static str,
    nitrite_note: &'static str,
    again: &'static str,
    error: &'static str,
}

fn text(language: Language) -> Text {
    match language {
        Language::English => Text {
            title: "Urine color check",
            choose_file: "Choose a photo of the sample",
            background: "Reference background",
            yellow: "Yellow",
            white: "White",
            analyze: "Analyze",
            start_camera: "Open camera",
            capture: "Capture and analyze",
            result: "Result",
            color: "Color",
            mean: "Mean RGB",
            nitrite: "Estimated nitrite",
            nitrite_note: "Approximate value from a linear calibration, not a laboratory measurement.",
            again: "Analyze another sample",
            error: "Error",
        },
        Language::Thai => Text {
            title: "ตรวจสีปัสสาวะ",
            choose_file: "เลือกภาพตัวอย่าง",
            background: "พื้นหลังอ้างอิง",
            yellow: "เหลือง",
            white: "ขาว",
            analyze: "วิเคราะห์",
            start_camera: "เปิดกล้อง",
            capture: "ถ่ายภาพและวิเคราะห์",
            result: "ผลการวิเคราะห์",
            color: "สี",
            mean: "ค่าเฉลี่ย RGB",
            nitrite: "ไนไตรต์โดยประมาณ",
            nitrite_note: "ค่าประมาณจากสมการเชิงเส้น ไม่ใช่ผลตรวจทางห้องปฏิบัติการ",
            again: "วิเคราะห์ตัวอย่างอื่น",
            error: "ข้อผิดพลาด",
        },
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{}</title><style>{}</style></head>\n<body>\n{}\n</body></html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn index_page(language: Language, default_mode: NitriteMode) -> String {
    let t = text(language);
    let selected = |mode: NitriteMode| if mode == default_mode { " selected" } else { "" };

    let body = format!(
        "<h1>{title}</h1>\n\
<form id=\"upload-form\" action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
<p><label>{choose}<br><input type=\"file\" name=\"image\" accept=\"image/*\"></label></p>\n\
<p><label>{background} <select name=\"mode\">\
<option value=\"yellow\"{ysel}>{yellow}</option>\
<option value=\"white\"{wsel}>{white}</option></select></label></p>\n\
<input type=\"hidden\" id=\"camera_image\" name=\"camera_image\">\n\
<p><button type=\"submit\">{analyze}</button></p>\n\
</form>\n\
<p><button type=\"button\" id=\"start-camera\">{start}</button> \
<button type=\"button\" id=\"capture\" disabled>{capture}</button></p>\n\
<video id=\"camera\" autoplay playsinline style=\"display:none;max-width:100%\"></video>\n\
<canvas id=\"snapshot\" style=\"display:none\"></canvas>\n\
<script>{js}</script>",
        title = t.title,
        choose = t.choose_file,
        background = t.background,
        ysel = selected(NitriteMode::Yellow),
        wsel = selected(NitriteMode::White),
        yellow = t.yellow,
        white = t.white,
        analyze = t.analyze,
        start = t.start_camera,
        capture = t.capture,
        js = CAMERA_JS,
    );

    page(t.title, &body)
}

pub fn result_page(stored: &StoredFile, analysis: &UrineAnalysis, language: Language) -> String {
    let t = text(language);
    let color = &analysis.color;
    let mode_name = match analysis.nitrite.mode {
        NitriteMode::Yellow => t.yellow,
        NitriteMode::White => t.white,
    };

    let body = format!(
        "<h1>{result}</h1>\n\
<p><img src=\"{url}\" alt=\"{alt}\"></p>\n\
<p><strong>{color_h}:</strong> {label} ({advice})</p>\n\
<p><strong>{mean_h}:</strong> ({r:.1}, {g:.1}, {b:.1}) \
<span class=\"swatch\" style=\"background:{hex}\"></span> {hex}</p>\n\
<p><strong>HSV:</strong> {h:.0}&deg;, {s:.0}%, {v:.0}%</p>\n\
<p><strong>{nitrite_h}:</strong> {mg:.3} mg/mL ({mode})</p>\n\
<p class=\"note\">{note}</p>\n\
<p><a href=\"/\">{again}</a></p>",
        result = t.result,
        url = escape_html(&stored.url),
        alt = escape_html(&stored.name),
        color_h = t.color,
        label = color.label.label(language),
        advice = color.label.advice(language),
        mean_h = t.mean,
        r = color.mean.red,
        g = color.mean.green,
        b = color.mean.blue,
        hex = escape_html(&color.hex),
        h = color.hsv.hue,
        s = color.hsv.saturation * 100.0,
        v = color.hsv.value * 100.0,
        nitrite_h = t.nitrite,
        mg = analysis.nitrite.mg_per_ml,
        mode = mode_name,
        note = t.nitrite_note,
        again = t.again,
    );

    page(t.result, &body)
}

pub fn error_page(status: StatusCode, message: &str, language: Language) -> String {
    let t = text(language);
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">{}</a></p>",
        t.error,
        status.as_u16(),
        escape_html(message),
        t.again
    );
    page(t.error, &body)
}
