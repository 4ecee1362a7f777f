use byteorder::WriteBytesExt;
use dataset::tensor::BITPLANES_SIZE;
use dataset::Example;
use std::io::{self, Write};

/// Bytes per example: the bit planes, the label and the piece code
pub const RECORD_SIZE: usize = BITPLANES_SIZE + 2;

/// Writes examples as fixed size binary records
pub struct SampleWriter<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> SampleWriter<W> {
    pub fn new(writer: W) -> Self {
        SampleWriter { writer, written: 0 }
    }

    pub fn write_example(&mut self, example: &Example) -> io::Result<()> {
        self.writer.write_all(&example.tensor.to_bitplanes())?;
        self.writer.write_u8(example.label)?;
        self.writer.write_u8(example.piece.code() as u8)?;

        self.written += 1;
        Ok(())
    }

    /// Number of examples written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
