use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use parallax_core::io::open_source;
use parallax_core::io::ser::SerSource;

#[derive(Args)]
pub struct InfoArgs {
    /// Frame source: SER file or image directory
    pub source: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let is_ser = args.source.is_file()
        && args
            .source
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ser"));

    if is_ser {
        let reader = SerSource::open(&args.source)?;
        let info = reader.source_info(&args.source);
        let header = reader.header();

        println!("File:        {}", info.filename.display());
        println!("Container:   SER");
        println!("Frames:      {}", reader.frame_count());
        println!("Dimensions:  {}x{}", info.width, info.height);
        println!("Bit depth:   {}", header.pixel_depth);
        println!("Color id:    {}", header.color_id);

        let frame_bytes = header.frame_byte_size();
        let total_mb = (frame_bytes * reader.frame_count()) as f64 / (1024.0 * 1024.0);
        println!("Data size:   {:.1} MB", total_mb);
        return Ok(());
    }

    let mut source = open_source(&args.source)?;
    let count = source.frame_count_hint();
    println!("Source:      {}", args.source.display());
    match source.next_frame()? {
        Some(frame) => {
            println!("Dimensions:  {}x{}", frame.width(), frame.height());
        }
        None => println!("Dimensions:  (no frames)"),
    }
    match count {
        Some(n) => println!("Frames:      {}", n),
        None => println!("Frames:      unknown"),
    }

    Ok(())
}
