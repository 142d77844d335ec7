/// The browser front-end. Loads the map JSON, draws it with OpenLayers and asks
/// the server for popups on click.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Web Map</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/ol@v10.2.1/ol.css" />
  <script src="https://cdn.jsdelivr.net/npm/ol@v10.2.1/dist/ol.js"></script>
  <style>
    html, body { margin: 0; height: 100%; font-family: sans-serif; font-size: 13px; }
    #map { position: absolute; inset: 0; }

    .info {
      position: absolute;
      z-index: 10;
      min-width: 200px;
      max-height: 320px;
      overflow: auto;
      background: #fff;
      border: 1px solid #888;
      box-shadow: 2px 2px 6px rgba(0, 0, 0, 0.35);
    }
    .info .titlebar { padding: 4px 6px; background: #444; color: #fff; font-weight: bold; }
    .info .close { float: right; margin-left: 12px; color: #fff; font-weight: normal; }
    .info table { border-collapse: collapse; width: 100%; }
    .info th, .info td { padding: 2px 6px; border-bottom: 1px solid #ddd; }
    .info th { text-align: left; background: #f4f4f4; }
    .info td.left { text-align: left; }
    .info td.right { text-align: right; }
  </style>
</head>

<body>
  <div id="map"></div>
  <script>
    function removeElementById(id) {
      const element = document.getElementById(id);
      if (element) element.remove();
    }

    function removeElementsByClass(className) {
      for (const element of Array.from(document.getElementsByClassName(className))) {
        element.remove();
      }
    }

    function toStroke(stroke) {
      return stroke && new ol.style.Stroke({
        color: stroke.color,
        width: stroke.width,
        lineDash: stroke.lineDash,
      });
    }

    function toFill(fill) {
      return fill && new ol.style.Fill({ color: fill.color });
    }

    function toImage(image) {
      if (!image) return undefined;
      if (image.type === 'icon') {
        return new ol.style.Icon({ src: image.src, scale: image.scale });
      }
      return new ol.style.Circle({
        radius: image.radius,
        fill: toFill(image.fill),
        stroke: toStroke(image.stroke),
      });
    }

    function toStyle(style) {
      if (!style) return undefined;
      return new ol.style.Style({
        fill: toFill(style.fill),
        stroke: toStroke(style.stroke),
        image: toImage(style.image),
      });
    }

    fetch('map.json')
      .then(res => res.json())
      .then(data => {
        const projection = data.projection;

        const basemapLayers = data.basemaps.map(basemap => new ol.layer.Tile({
          source: new ol.source.TileArcGISRest({ url: basemap.url, projection }),
          opacity: basemap.opacity,
          visible: basemap.visible,
        }));

        const format = new ol.format.GeoJSON({
          dataProjection: projection,
          featureProjection: projection,
        });
        const layers = data.layers.map(layer => {
          const features = format.readFeatures(layer.features);
          for (const feature of features) {
            const style = toStyle(feature.get('style'));
            if (style) feature.setStyle(style);
          }
          return new ol.layer.Vector({
            source: new ol.source.Vector({ features }),
            opacity: layer.opacity,
            visible: layer.visible,
            properties: { id: layer.id, title: layer.title },
          });
        });

        const extent = data.view.extent || undefined;
        const map = new ol.Map({
          target: 'map',
          layers: basemapLayers.concat(layers),
          view: new ol.View({
            projection,
            extent,
            center: data.view.center || [0, 0],
            zoom: data.view.zoom,
          }),
        });
        map.addInteraction(new ol.interaction.Select({
          condition: ol.events.condition.pointerMove,
          style: toStyle(data.highlight),
        }));
        if (extent) map.getView().fit(extent);

        map.on('click', e => {
          removeElementsByClass('info');
          const rect = map.getTargetElement().getBoundingClientRect();
          const params = new URLSearchParams({
            x: e.coordinate[0],
            y: e.coordinate[1],
            px: e.pixel[0] + rect.left + window.scrollX,
            py: e.pixel[1] + rect.top + window.scrollY,
            resolution: map.getView().getResolution(),
          });

          fetch('query?' + params)
            .then(res => res.json())
            .then(popups => {
              for (const popup of popups) {
                const infoDiv = document.createElement('div');
                infoDiv.innerHTML = popup.html;
                infoDiv.id = popup.id;
                infoDiv.className = 'info';
                infoDiv.style.left = popup.left + 'px';
                infoDiv.style.top = popup.top + 'px';
                document.body.appendChild(infoDiv);
              }
            });
        });
      });
  </script>
</body>

</html>
"#;
