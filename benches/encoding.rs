use bacnet_rs::datalink::bip::BvlcHeader;
use bacnet_rs::encoding::{decode_application_unsigned, decode_tagged_item, encode_application_unsigned};
use bacnet_rs::message::Message;
use bacnet_rs::network::Npdu;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn encode_benchmark(c: &mut Criterion) {
    c.bench_function("encode_application_unsigned", |b| {
        b.iter(|| black_box(encode_application_unsigned(black_box(321)).encode().unwrap()))
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let encoded = encode_application_unsigned(321).encode().unwrap();
    c.bench_function("decode_application_unsigned", |b| {
        b.iter(|| black_box(decode_application_unsigned(black_box(&encoded)).unwrap()))
    });
    c.bench_function("decode_tagged_item", |b| {
        b.iter(|| black_box(decode_tagged_item(black_box(&encoded)).unwrap()))
    });
}

fn message_round_trip_benchmark(c: &mut Criterion) {
    let msg = Message::new_i_am(BvlcHeader::broadcast(0), Npdu::global_broadcast(), 321, 1024, 0, 1);
    let encoded = msg.encode().unwrap();
    c.bench_function("message_parse_i_am", |b| {
        b.iter(|| black_box(Message::parse(black_box(&encoded)).unwrap()))
    });
}

criterion_group!(benches, encode_benchmark, decode_benchmark, message_round_trip_benchmark);
criterion_main!(benches);
