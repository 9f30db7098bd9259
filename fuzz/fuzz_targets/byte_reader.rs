#![no_main]

use bitstream::ByteReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 5;
        let arg = usize::from(data[idx]) * 7;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_u8();
            }
            1 => {
                let _ = reader.read_u16();
            }
            2 => {
                let _ = reader.read_u32();
            }
            3 => {
                let _ = reader.u16_at(arg);
            }
            _ => {
                if let Ok(slice) = reader.slice_at(arg, idx) {
                    assert_eq!(slice.len(), idx);
                }
            }
        }
        assert!(reader.position() <= reader.len());
    }
});
