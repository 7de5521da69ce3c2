use crate::chunk::Chunk;
use crate::http::range_header;

#[test]
fn range_header_covers_whole_chunk() {
    let c = Chunk::new(0, 33, 65);
    assert_eq!(range_header(&c), "bytes=33-65");
}

#[test]
fn range_header_resumes_from_position() {
    let mut c = Chunk::new(0, 33, 65);
    c.add_position(10);
    assert_eq!(range_header(&c), "bytes=43-65");
}
