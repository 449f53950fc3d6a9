mod map_dto;

pub use map_dto::{
    ActionOutcomeDto, CenterViewportDto, DeviceFixDto, FilterToggleDto, LocationDetailDto,
    MountSurfaceDto, SelectPointDto, SurfaceSnapshotDto,
};
