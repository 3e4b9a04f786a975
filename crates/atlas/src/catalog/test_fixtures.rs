/// Small catalog excerpt shared by unit tests across the crate. Contains one
/// area with two chapters, a two-side chapter, a subroom split and a dangling
/// room order entry ("ghost").
pub(crate) const FIXTURE_CATALOG_JSON: &str = r#"{
  "areas": [
    {
      "id": "celeste",
      "gameId": "Celeste",
      "name": "Celeste",
      "desc": "Rooms from the base game.",
      "chapters": [
        {
          "id": "prologue",
          "gameId": "0",
          "name": "Prologue",
          "desc": "The introduction.",
          "image": "prologue/cover",
          "sides": [
            {
              "id": "a",
              "name": "A",
              "roomCount": 1,
              "checkpoints": [
                { "name": "Start", "roomOrder": ["0"] }
              ],
              "rooms": [
                {
                  "id": "0",
                  "name": "Bridge",
                  "image": "prologue/1/1",
                  "defaultSpawn": { "x": 88, "y": 160 }
                }
              ]
            }
          ]
        },
        {
          "id": "city",
          "gameId": "1",
          "name": "Forsaken City",
          "desc": "The first proper chapter.",
          "chapterNo": 1,
          "image": "city/cover",
          "sides": [
            {
              "id": "a",
              "name": "A",
              "roomCount": 5,
              "checkpoints": [
                { "name": "Start", "roomOrder": ["1a", "1b", "ghost"] },
                { "name": "Crossing", "roomOrder": ["2", "3"] }
              ],
              "rooms": [
                {
                  "id": "1a",
                  "name": "First Steps",
                  "image": "city/1/1",
                  "defaultSpawn": { "x": 104, "y": 120 }
                },
                {
                  "id": "1b",
                  "image": "city/1/2",
                  "defaultSpawn": { "x": 40, "y": 8 }
                },
                {
                  "id": "2",
                  "name": "Contraption",
                  "image": "city/2/1",
                  "defaultSpawn": { "x": 16, "y": 208 },
                  "subrooms": [
                    { "name": "Contraption Entry", "image": "city/2/1" },
                    { "name": "Contraption Exit", "image": "city/2/2" }
                  ]
                },
                {
                  "id": "3",
                  "name": "Scrap Pit",
                  "image": "city/3/1",
                  "defaultSpawn": { "x": 64, "y": 88 }
                }
              ]
            },
            {
              "id": "b",
              "name": "B",
              "roomCount": 1,
              "checkpoints": [
                { "name": "Start", "roomOrder": ["1a"] }
              ],
              "rooms": [
                {
                  "id": "1a",
                  "name": "Rooftop Run",
                  "image": "city-b/1/1",
                  "defaultSpawn": { "x": 24, "y": 180 }
                }
              ]
            }
          ]
        }
      ]
    }
  ]
}"#;
