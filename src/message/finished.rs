use nom::bytes::complete::take;
use nom::IResult;

use crate::buffer::Buf;
use crate::types::ProtocolVersion;

/// Finished body: opaque verify_data of a version-determined length.
#[derive(Debug, PartialEq, Eq)]
pub struct Finished<'a> {
    pub verify_data: &'a [u8],
}

impl<'a> Finished<'a> {
    pub fn new(verify_data: &'a [u8]) -> Self {
        Finished { verify_data }
    }

    /// Take exactly `version.finished_len()` bytes. The length is never read
    /// from the input.
    pub fn parse(input: &'a [u8], version: ProtocolVersion) -> IResult<&'a [u8], Finished<'a>> {
        let verify_data_length = version.finished_len();
        let (input, verify_data) = take(verify_data_length)(input)?;
        Ok((input, Finished { verify_data }))
    }

    pub fn serialize(&self, output: &mut Buf) {
        output.extend_from_slice(self.verify_data);
    }
}
