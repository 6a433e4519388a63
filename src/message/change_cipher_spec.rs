use nom::bytes::complete::tag;
use nom::IResult;

use crate::buffer::Buf;

/// ChangeCipherSpec body, the single byte `1`.
#[derive(Debug, PartialEq, Eq)]
pub struct ChangeCipherSpec;

impl ChangeCipherSpec {
    pub fn parse(input: &[u8]) -> IResult<&[u8], ChangeCipherSpec> {
        let (input, _) = tag(&[1u8][..])(input)?;
        Ok((input, ChangeCipherSpec))
    }

    pub fn serialize(&self, output: &mut Buf) {
        output.push(1);
    }
}
