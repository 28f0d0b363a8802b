// screen-lens/src/ocr/tesseract.rs

// ============================================================================
// TESSERACT - OCR via linha de comando
// ============================================================================
//
// A imagem é gravada num PNG temporário e o `tesseract` escreve o resultado
// no stdout. Cada chamada é independente (nenhum estado compartilhado), então
// várias threads de trabalho podem usar o mesmo `TesseractEngine`.
//
// ============================================================================

use image::{DynamicImage, ImageFormat};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

use super::{parse_osd, OcrEngine, OcrError, OsdInfo};

/// Motor de OCR baseado no binário do Tesseract
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    /// Caminho ou nome do executável
    command: String,
    /// Page segmentation mode usado no reconhecimento de texto
    psm: u32,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>, psm: u32) -> Self {
        TesseractEngine {
            command: command.into(),
            psm,
        }
    }

    /// Verifica se o Tesseract está instalado e retorna os idiomas disponíveis
    pub fn verify(&self) -> Result<Vec<String>, OcrError> {
        info!("🔍 Verificando instalação do Tesseract ({})...", self.command);

        let output = self.run(Command::new(&self.command).arg("--list-langs"))?;
        let langs = parse_language_list(&String::from_utf8_lossy(&output.stdout));

        info!("✅ Tesseract encontrado: {} idiomas instalados", langs.len());
        debug!("   📚 Idiomas: {}", langs.join(", "));

        Ok(langs)
    }

    /// Grava a imagem num PNG temporário (o arquivo some quando sai de escopo)
    fn write_temp_image(image: &DynamicImage) -> Result<NamedTempFile, OcrError> {
        let file = tempfile::Builder::new()
            .prefix("screen-lens-")
            .suffix(".png")
            .tempfile()?;

        image.save_with_format(file.path(), ImageFormat::Png)?;

        Ok(file)
    }

    fn text_command(&self, path: &Path, languages: &str) -> Command {
        let mut command = Command::new(&self.command);
        command
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(languages)
            .arg("--psm")
            .arg(self.psm.to_string());
        command
    }

    fn osd_command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.command);
        command.arg(path).arg("stdout").arg("--psm").arg("0");
        command
    }

    /// Executa o comando e converte falhas em `OcrError`
    fn run(&self, command: &mut Command) -> Result<Output, OcrError> {
        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => OcrError::EngineMissing(self.command.clone()),
            _ => OcrError::Io(e),
        })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl OcrEngine for TesseractEngine {
    fn image_to_string(&self, image: &DynamicImage, languages: &str) -> Result<String, OcrError> {
        debug!("🔍 Tesseract [{}] {}x{}", languages, image.width(), image.height());

        let file = Self::write_temp_image(image)?;
        let output = self.run(&mut self.text_command(file.path(), languages))?;

        Ok(clean_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn image_to_osd(&self, image: &DynamicImage) -> Result<OsdInfo, OcrError> {
        let file = Self::write_temp_image(image)?;

        // Com poucos caracteres o Tesseract termina com erro: vira OcrError::Osd
        let output = self
            .run(&mut self.osd_command(file.path()))
            .map_err(|e| match e {
                OcrError::Engine { stderr, .. } => OcrError::Osd(stderr),
                other => other,
            })?;

        parse_osd(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Remove o form feed e as quebras de linha finais que o Tesseract adiciona
fn clean_output(raw: &str) -> String {
    raw.trim_end_matches(|c: char| c.is_whitespace() || c == '\u{c}')
        .to_string()
}

/// A primeira linha do `--list-langs` é um cabeçalho
/// ("List of available languages in ...")
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_list_skips_header() {
        let stdout = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\nrus\n";
        assert_eq!(parse_language_list(stdout), vec!["eng", "osd", "rus"]);
    }

    #[test]
    fn output_is_trimmed_at_the_end_only() {
        assert_eq!(clean_output("  Hello\nworld\n\n\u{c}"), "  Hello\nworld");
        assert_eq!(clean_output("\n\u{c}"), "");
    }

    #[test]
    fn missing_binary_is_reported_as_engine_missing() {
        let engine = TesseractEngine::new("screen-lens-no-such-tesseract", 3);
        assert!(matches!(engine.verify(), Err(OcrError::EngineMissing(_))));
    }
}
