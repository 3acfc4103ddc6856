//! Example of writing a file in one encoding and reading it back with BOM detection

use emx_textio::{Encoding, Target, TextIoConfig, TextReader, TextWriter};

fn main() -> anyhow::Result<()> {
    println!("=== Transcoding Example ===\n");

    let dir = std::env::temp_dir().join("emx-textio-demo");
    std::fs::create_dir_all(&dir)?;

    let config = TextIoConfig::new().with_emit_bom(true);

    for encoding in Encoding::CONCRETE {
        let path = dir.join(format!("{}.txt", encoding.name().to_lowercase()));

        let mut writer = TextWriter::open(Target::Path(path.clone()), Some(encoding), &config)?;
        writer.write_line("Line 1st")?;
        writer.write_line("Other line")?;
        writer.write_line("Last line \u{1F600}")?;
        writer.close()?;

        let size = std::fs::metadata(&path)?.len();
        let mut reader = TextReader::open(Target::Path(path.clone()), None, &TextIoConfig::default())?;
        println!("{} ({} bytes, detected {}):", path.display(), size, reader.encoding());
        while let Some(line) = reader.read_line()? {
            println!("  {:>2}: {}", reader.line_number(), line);
        }
        reader.close()?;
    }

    Ok(())
}
