//! HTML rendering of the upload page.

use blindcv_core::Notice;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 720px; margin: 40px auto; color: #222; }
h1 { font-size: 1.6em; }
.notice { padding: 10px 14px; margin: 8px 0; border-radius: 4px; }
.notice.success { background: #e6f4ea; color: #1e4620; }
.notice.error { background: #fdecea; color: #611a15; }
form { margin: 24px 0; }
.download { display: inline-block; padding: 10px 18px; background: #1a73e8; color: #fff; text-decoration: none; border-radius: 4px; }
";

/// Upload form with `notices` above it, and the archive link when `show_download`.
pub fn upload_page(notices: &[Notice], show_download: bool) -> String {
    let mut body = String::new();

    body.push_str("<h1>Anonimizador de Currículos</h1>\n");
    body.push_str(
        "<p>Envie um ou mais currículos em PDF. Nome, contatos, endereço, links, empresas e \
instituições de ensino serão substituídos por marcadores genéricos.</p>\n",
    );

    for notice in notices {
        body.push_str(&format!(
            "<div class=\"notice {}\">{}</div>\n",
            notice.level.as_str(),
            encode_text(&notice.text)
        ));
    }

    body.push_str(
        "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
<input type=\"file\" name=\"files[]\" accept=\".pdf\" multiple>\n\
<button type=\"submit\">Anonimizar</button>\n\
</form>\n",
    );

    if show_download {
        body.push_str(&format!(
            "<a class=\"download\" href=\"{}\">Baixar currículos (ZIP)</a>\n",
            encode_double_quoted_attribute("/download_all")
        ));
    }

    layout("Anonimizador de Currículos", &body)
}

/// Minimal page for errors raised outside the pipeline.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        "<h1>Erro {}</h1>\n<div class=\"notice error\">{}</div>\n<p><a href=\"/\">Voltar</a></p>\n",
        status,
        encode_text(message)
    );
    layout("Erro", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        encode_text(title),
        STYLE,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_are_escaped() {
        let page = upload_page(&[Notice::error("<script>alert(1)</script>.pdf")], false);
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("notice error"));
    }

    #[test]
    fn test_download_link_only_when_enabled() {
        assert!(!upload_page(&[], false).contains("/download_all"));
        assert!(upload_page(&[], true).contains("href=\"/download_all\""));
    }

    #[test]
    fn test_form_posts_files_field() {
        let page = upload_page(&[], false);
        assert!(page.contains("name=\"files[]\""));
        assert!(page.contains("enctype=\"multipart/form-data\""));
    }
}
