pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<usize>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0;
    for record in records.into_iter() {
        wtr.serialize(record)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}
